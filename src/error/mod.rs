//! # Error Module
//!
//! User-friendly error types for the photo statistics pipeline.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, tag names, what went wrong
//! - **Per-file failures stay per-file** - only structural problems
//!   (an unreadable snapshot, an unusable library root) surface here;
//!   everything recoverable becomes a warning instead

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum PhotoStatsError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Metadata extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while discovering photo files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a single exiftool invocation
///
/// These are always caught per-file by the collector; a file that fails
/// extraction contributes no record and the scan continues.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to launch {tool}: {source}. Is exiftool installed and on PATH?")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exiftool exited with status {status} for {path}")]
    ToolFailed { path: PathBuf, status: String },

    #[error("exiftool timed out after {seconds}s on {path}")]
    Timeout { path: PathBuf, seconds: u64 },

    #[error("exiftool produced unparseable output for {path}: {reason}")]
    MalformedOutput { path: PathBuf, reason: String },
}

/// Errors with the on-disk record snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("No snapshot found at {path}. Run a scan without --cached first.")]
    NotFound { path: PathBuf },

    #[error("Failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot {path} is corrupt: {reason}. Rescan to rebuild it.")]
    Corrupt { path: PathBuf, reason: String },

    #[error(
        "Snapshot {path} has schema version {found}, expected {expected}. \
         Rescan to rebuild it."
    )]
    SchemaVersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, PhotoStatsError>;
