//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the statistics pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Metadata extraction phase events
    Extract(ExtractEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { paths: Vec<PathBuf> },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// A photo was found
    PhotoFound { path: PathBuf },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_photos: usize },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories scanned so far
    pub directories_scanned: usize,
    /// Number of photos found so far
    pub photos_found: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// Events during the metadata extraction phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractEvent {
    /// Extraction has started
    Started { total_photos: usize },
    /// Progress update during extraction
    Progress(ExtractProgress),
    /// A photo's tags were read and normalized
    RecordBuilt { path: PathBuf },
    /// A camera model had no crop-factor rule; the neutral factor was used
    UnknownCameraModel { model: String },
    /// A tag value failed to parse; the field was left absent
    TagWarning {
        path: PathBuf,
        field: String,
        message: String,
    },
    /// exiftool failed for one file; it contributes no record
    Error { path: PathBuf, message: String },
    /// Extraction completed
    Completed {
        total_records: usize,
        failed_files: usize,
    },
}

/// Progress information during extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractProgress {
    /// Number of photos processed so far
    pub completed: usize,
    /// Total number of photos to process
    pub total: usize,
    /// Current photo being processed
    pub current_path: PathBuf,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Extracting,
    LoadingSnapshot,
    Summarizing,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Total photo files considered
    pub total_photos: usize,
    /// Records built (files that yielded metadata)
    pub total_records: usize,
    /// Files that failed extraction entirely
    pub failed_files: usize,
    /// Individual tag values that failed to parse
    pub tag_warnings: usize,
    /// Whether the records came from a snapshot instead of a fresh scan
    pub from_snapshot: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Extracting => write!(f, "Extracting"),
            PipelinePhase::LoadingSnapshot => write!(f, "Loading snapshot"),
            PipelinePhase::Summarizing => write!(f, "Summarizing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Scan(ScanEvent::Progress(ScanProgress {
            directories_scanned: 10,
            photos_found: 50,
            current_path: PathBuf::from("/photos"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Scan(ScanEvent::Progress(p)) => {
                assert_eq!(p.photos_found, 50);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn pipeline_summary_is_serializable() {
        let summary = PipelineSummary {
            total_photos: 1000,
            total_records: 990,
            failed_files: 10,
            tag_warnings: 37,
            from_snapshot: false,
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("990"));
        assert!(json.contains("37"));
    }
}
