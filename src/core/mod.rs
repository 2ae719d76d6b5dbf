//! # Core Module
//!
//! The GUI-agnostic photo statistics engine.
//!
//! ## Modules
//! - `scanner` - Discovers photo files in directories
//! - `extractor` - Reads raw tags from files via exiftool
//! - `normalizer` - Turns raw tags into typed photo records
//! - `crop` - Maps camera models to sensor crop factors
//! - `collector` - Drives extraction and accumulates the record set
//! - `snapshot` - Persists the record set between scans
//! - `report` - Aggregates records into shooting-habit summaries
//! - `pipeline` - Orchestrates the full workflow

pub mod collector;
pub mod crop;
pub mod extractor;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod snapshot;

// Re-export commonly used types
pub use collector::{CollectResult, PhotoRecordSet, RecordCollector};
pub use crop::{to_35mm_equivalent, CropFactorResolver, CropFactorRule};
pub use extractor::{ExifToolExtractor, RawTagSet, TagExtractor};
pub use normalizer::{ParseWarning, PhotoRecord, TagField, TagNormalizer};
pub use report::LibraryReport;
pub use scanner::PhotoFile;
