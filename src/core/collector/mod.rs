//! # Collector Module
//!
//! Drives extraction and normalization over the scanned file list and
//! accumulates the resulting records.
//!
//! Files are processed strictly one at a time, in scan-visitation order,
//! and appended in that order. A file whose extraction fails contributes
//! no record; the failure is counted and the scan continues.

use crate::core::extractor::TagExtractor;
use crate::core::normalizer::{ParseWarning, PhotoRecord, TagNormalizer};
use crate::core::scanner::PhotoFile;
use crate::events::{Event, EventSender, ExtractEvent, ExtractProgress};
use serde::{Deserialize, Serialize};

/// Ordered sequence of photo records, one per successfully extracted file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRecordSet {
    records: Vec<PhotoRecord>,
}

impl PhotoRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<PhotoRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: PhotoRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhotoRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a PhotoRecordSet {
    type Item = &'a PhotoRecord;
    type IntoIter = std::slice::Iter<'a, PhotoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Result of collecting records over a scanned file list
#[derive(Debug)]
pub struct CollectResult {
    /// Records in scan-visitation order
    pub records: PhotoRecordSet,
    /// Per-tag parse warnings across all files
    pub warnings: Vec<ParseWarning>,
    /// Files whose extraction failed entirely
    pub failed_files: usize,
    /// Distinct camera models that had no crop-factor rule
    pub unknown_models: Vec<String>,
}

/// Accumulates photo records from a scanned file list
pub struct RecordCollector {
    extractor: Box<dyn TagExtractor>,
    normalizer: TagNormalizer,
}

impl RecordCollector {
    /// Create a collector over an extractor and a normalizer
    pub fn new(extractor: Box<dyn TagExtractor>, normalizer: TagNormalizer) -> Self {
        Self {
            extractor,
            normalizer,
        }
    }

    /// Extract and normalize every file, in order
    pub fn collect(&self, photos: &[PhotoFile], events: &EventSender) -> CollectResult {
        events.send(Event::Extract(ExtractEvent::Started {
            total_photos: photos.len(),
        }));

        let mut records = PhotoRecordSet::new();
        let mut warnings = Vec::new();
        let mut failed_files = 0;
        let mut unknown_models: Vec<String> = Vec::new();

        for (index, photo) in photos.iter().enumerate() {
            events.send(Event::Extract(ExtractEvent::Progress(ExtractProgress {
                completed: index,
                total: photos.len(),
                current_path: photo.path.clone(),
            })));

            let tags = match self.extractor.extract(&photo.path) {
                Ok(tags) => tags,
                Err(e) => {
                    tracing::warn!(path = %photo.path.display(), error = %e, "skipping file");
                    events.send(Event::Extract(ExtractEvent::Error {
                        path: photo.path.clone(),
                        message: e.to_string(),
                    }));
                    failed_files += 1;
                    continue;
                }
            };

            let normalized = self.normalizer.normalize(&photo.path, &tags);

            for warning in &normalized.warnings {
                events.send(Event::Extract(ExtractEvent::TagWarning {
                    path: warning.path.clone(),
                    field: warning.field.to_string(),
                    message: warning.reason.clone(),
                }));
            }
            warnings.extend(normalized.warnings);

            if let Some(model) = normalized.unknown_model {
                if !unknown_models.contains(&model) {
                    unknown_models.push(model.clone());
                }
                events.send(Event::Extract(ExtractEvent::UnknownCameraModel { model }));
            }

            events.send(Event::Extract(ExtractEvent::RecordBuilt {
                path: photo.path.clone(),
            }));
            records.push(normalized.record);
        }

        events.send(Event::Extract(ExtractEvent::Completed {
            total_records: records.len(),
            failed_files,
        }));

        CollectResult {
            records,
            warnings,
            failed_files,
            unknown_models,
        }
    }
}
