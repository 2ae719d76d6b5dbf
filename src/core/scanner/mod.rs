//! # Scanner Module
//!
//! Discovers photo files in directories.
//!
//! ## Supported Formats
//! The default filter accepts exactly the extensions a Photos library
//! exports its originals with:
//! - JPEG (.jpeg)
//! - HEIC (.heic) - newer phone cameras
//!
//! Matching is case-sensitive; override the set via
//! [`ScanConfig::extensions`] for libraries that use other spellings.
//!
//! ## Example
//! ```rust,ignore
//! use photo_exif_stats::core::scanner::{PhotoScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(&["/Users/me/Pictures".into()])?;
//! ```

mod filter;
mod walker;

pub use filter::PhotoFileFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents a discovered photo file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoFile {
    /// Path to the photo file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered photos, in directory-walk visitation order
    pub photos: Vec<PhotoFile>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for photo scanners
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait PhotoScanner: Send + Sync {
    /// Scan directories and return discovered photos
    fn scan(&self, paths: &[PathBuf]) -> Result<ScanResult, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanResult, ScanError>;
}
