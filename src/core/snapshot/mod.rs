//! # Snapshot Module
//!
//! Persists the record set between scans so exploratory runs don't have to
//! re-read tens of thousands of files.
//!
//! ## Format
//! A single JSON document with an explicit schema version:
//!
//! ```json
//! { "schema_version": 1, "created_at": "...", "records": [ ... ] }
//! ```
//!
//! A snapshot written by an incompatible version of the schema fails loudly
//! on load instead of being reinterpreted. There is no silent fallback to
//! rescanning: a cached run with a missing or unreadable snapshot is an
//! error the user resolves by rescanning explicitly.

use crate::core::collector::PhotoRecordSet;
use crate::error::SnapshotError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Version of the on-disk record schema.
///
/// Bump whenever `PhotoRecord` changes shape incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

/// Directory component under the platform cache dir
const APP_CACHE_DIR: &str = "photo-exif-stats";

/// File name of the snapshot document
const SNAPSHOT_FILE: &str = "snapshot.json";

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    schema_version: u32,
    created_at: DateTime<Utc>,
    records: PhotoRecordSet,
}

/// Only the version field, decoded first so a mismatch can be reported
/// before the records are touched
#[derive(Debug, Deserialize)]
struct SnapshotVersion {
    schema_version: u32,
}

/// The well-known snapshot location: `<cache_dir>/photo-exif-stats/snapshot.json`
pub fn default_snapshot_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_CACHE_DIR)
        .join(SNAPSHOT_FILE)
}

/// Write the record set to `path`, replacing any previous snapshot
pub fn save(path: &Path, records: &PhotoRecordSet) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SnapshotError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let document = SnapshotDocument {
        schema_version: SCHEMA_VERSION,
        created_at: Utc::now(),
        records: records.clone(),
    };

    let json = serde_json::to_string(&document).map_err(|e| SnapshotError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    })?;

    fs::write(path, json).map_err(|e| SnapshotError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), records = records.len(), "snapshot written");
    Ok(())
}

/// Load a record set previously written by [`save`]
pub fn load(path: &Path) -> Result<PhotoRecordSet, SnapshotError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(SnapshotError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let version: SnapshotVersion =
        serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if version.schema_version != SCHEMA_VERSION {
        return Err(SnapshotError::SchemaVersionMismatch {
            path: path.to_path_buf(),
            found: version.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    let document: SnapshotDocument =
        serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::info!(path = %path.display(), records = document.records.len(), "snapshot loaded");
    Ok(document.records)
}
