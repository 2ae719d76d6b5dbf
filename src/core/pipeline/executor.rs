//! Pipeline execution implementation.

use crate::core::collector::{PhotoRecordSet, RecordCollector};
use crate::core::crop::{CropFactorResolver, CropFactorRule};
use crate::core::extractor::{ExifToolExtractor, TagExtractor, DEFAULT_TIMEOUT};
use crate::core::normalizer::{ParseWarning, TagNormalizer};
use crate::core::scanner::{PhotoScanner, ScanConfig, WalkDirScanner};
use crate::core::snapshot;
use crate::error::PhotoStatsError;
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// The record set, freshly scanned or loaded from the snapshot
    pub records: PhotoRecordSet,
    /// Per-tag parse warnings (empty on a cached run)
    pub warnings: Vec<ParseWarning>,
    /// Non-fatal scanning errors, as display strings
    pub scan_errors: Vec<String>,
    /// Files whose extraction failed entirely
    pub failed_files: usize,
    /// Distinct camera models that had no crop-factor rule
    pub unknown_models: Vec<String>,
    /// Photo files considered (equals the record count on a cached run)
    pub total_photos: usize,
    /// Total bytes of the scanned files (0 on a cached run)
    pub total_bytes: u64,
    /// Whether the records came from the snapshot
    pub from_snapshot: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Library directories to scan
    pub paths: Vec<PathBuf>,
    /// Load the snapshot instead of rescanning
    pub use_snapshot: bool,
    /// Snapshot location
    pub snapshot_path: PathBuf,
    /// Scanner configuration
    pub scan_config: ScanConfig,
    /// exiftool binary name or path
    pub exiftool_command: String,
    /// Per-file extraction budget
    pub extract_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            use_snapshot: false,
            snapshot_path: snapshot::default_snapshot_path(),
            scan_config: ScanConfig::default(),
            exiftool_command: "exiftool".to_string(),
            extract_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    extractor: Option<Box<dyn TagExtractor>>,
    crop_rules: Option<Vec<CropFactorRule>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            extractor: None,
            crop_rules: None,
        }
    }

    /// Add library directories to scan
    pub fn paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.paths = paths;
        self
    }

    /// Load the snapshot instead of rescanning
    pub fn use_snapshot(mut self, cached: bool) -> Self {
        self.config.use_snapshot = cached;
        self
    }

    /// Override the snapshot location
    pub fn snapshot_path(mut self, path: PathBuf) -> Self {
        self.config.snapshot_path = path;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Override the accepted file extensions
    pub fn extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.scan_config.extensions = Some(extensions);
        self
    }

    /// Use a specific exiftool binary
    pub fn exiftool_command(mut self, command: impl Into<String>) -> Self {
        self.config.exiftool_command = command.into();
        self
    }

    /// Override the per-file extraction budget
    pub fn extract_timeout(mut self, timeout: Duration) -> Self {
        self.config.extract_timeout = timeout;
        self
    }

    /// Substitute the extractor boundary (e.g., for testing)
    pub fn extractor(mut self, extractor: Box<dyn TagExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Use a custom crop-factor rule list
    pub fn crop_rules(mut self, rules: Vec<CropFactorRule>) -> Self {
        self.crop_rules = Some(rules);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        let extractor = self.extractor.unwrap_or_else(|| {
            Box::new(
                ExifToolExtractor::new()
                    .with_command(self.config.exiftool_command.clone())
                    .with_timeout(self.config.extract_timeout),
            )
        });

        let resolver = match self.crop_rules {
            Some(rules) => CropFactorResolver::new(rules),
            None => CropFactorResolver::with_default_rules(),
        };

        Pipeline {
            config: self.config,
            collector: RecordCollector::new(extractor, TagNormalizer::new(resolver)),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The photo statistics pipeline
pub struct Pipeline {
    config: PipelineConfig,
    collector: RecordCollector,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, PhotoStatsError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(
        &self,
        events: &EventSender,
    ) -> Result<PipelineResult, PhotoStatsError> {
        let start_time = Instant::now();

        events.send(Event::Pipeline(PipelineEvent::Started));

        let result = if self.config.use_snapshot {
            self.run_cached(events, start_time)
        } else {
            self.run_scan(events, start_time)
        };

        match &result {
            Ok(r) => {
                events.send(Event::Pipeline(PipelineEvent::Completed {
                    summary: PipelineSummary {
                        total_photos: r.total_photos,
                        total_records: r.records.len(),
                        failed_files: r.failed_files,
                        tag_warnings: r.warnings.len(),
                        from_snapshot: r.from_snapshot,
                        duration_ms: r.duration_ms,
                    },
                }));
            }
            Err(e) => {
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: e.to_string(),
                }));
            }
        }

        result
    }

    /// Cached run: the snapshot is the only source, and its absence is the
    /// user's cue to rescan
    fn run_cached(
        &self,
        events: &EventSender,
        start_time: Instant,
    ) -> Result<PipelineResult, PhotoStatsError> {
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::LoadingSnapshot,
        }));

        let records = snapshot::load(&self.config.snapshot_path)?;

        Ok(PipelineResult {
            total_photos: records.len(),
            total_bytes: 0,
            records,
            warnings: Vec::new(),
            scan_errors: Vec::new(),
            failed_files: 0,
            unknown_models: Vec::new(),
            from_snapshot: true,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Fresh run: scan, extract every file sequentially, then overwrite the
    /// snapshot
    fn run_scan(
        &self,
        events: &EventSender,
        start_time: Instant,
    ) -> Result<PipelineResult, PhotoStatsError> {
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = WalkDirScanner::new(self.config.scan_config.clone());
        let scan_result = scanner.scan_with_events(&self.config.paths, events)?;

        let scan_errors: Vec<String> =
            scan_result.errors.iter().map(|e| e.to_string()).collect();
        let total_photos = scan_result.photos.len();
        let total_bytes = scan_result.photos.iter().map(|p| p.size).sum();

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Extracting,
        }));

        let collected = self.collector.collect(&scan_result.photos, events);

        snapshot::save(&self.config.snapshot_path, &collected.records)?;

        Ok(PipelineResult {
            records: collected.records,
            warnings: collected.warnings,
            scan_errors,
            failed_files: collected.failed_files,
            unknown_models: collected.unknown_models,
            total_photos,
            total_bytes,
            from_snapshot: false,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::RawTagSet;
    use crate::error::{ExtractError, SnapshotError};
    use serde_json::json;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    /// Extractor that reports the same model for every file
    struct StaticExtractor;

    impl TagExtractor for StaticExtractor {
        fn extract(&self, _path: &Path) -> Result<RawTagSet, ExtractError> {
            let mut tags = RawTagSet::new();
            tags.insert("Model".to_string(), json!("X-T4"));
            tags.insert("FocalLength".to_string(), json!("23.0 mm"));
            Ok(tags)
        }
    }

    fn create_test_photo(dir: &Path, name: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    }

    #[test]
    fn pipeline_builder_creates_pipeline() {
        let pipeline = Pipeline::builder()
            .paths(vec![PathBuf::from("/photos")])
            .use_snapshot(true)
            .build();

        assert!(pipeline.config.use_snapshot);
        assert_eq!(pipeline.config.exiftool_command, "exiftool");
    }

    #[test]
    fn pipeline_handles_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot_path = temp_dir.path().join("snapshot.json");

        let pipeline = Pipeline::builder()
            .paths(vec![temp_dir.path().to_path_buf()])
            .snapshot_path(snapshot_path)
            .extractor(Box::new(StaticExtractor))
            .build();

        let result = pipeline.run().unwrap();

        assert_eq!(result.total_photos, 0);
        assert!(result.records.is_empty());
        assert!(!result.from_snapshot);
    }

    #[test]
    fn scan_run_builds_records_and_writes_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let library = temp_dir.path().join("library");
        std::fs::create_dir(&library).unwrap();
        create_test_photo(&library, "a.jpeg");
        create_test_photo(&library, "b.heic");
        let snapshot_path = temp_dir.path().join("snapshot.json");

        let pipeline = Pipeline::builder()
            .paths(vec![library])
            .snapshot_path(snapshot_path.clone())
            .extractor(Box::new(StaticExtractor))
            .build();

        let result = pipeline.run().unwrap();

        assert_eq!(result.total_photos, 2);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.total_bytes, 8);
        assert!(snapshot_path.exists());

        // The derived field made it into the records
        let record = result.records.iter().next().unwrap();
        assert_eq!(record.focal_length_35mm_x100, Some(3450));
    }

    #[test]
    fn cached_run_reads_back_the_previous_scan() {
        let temp_dir = TempDir::new().unwrap();
        let library = temp_dir.path().join("library");
        std::fs::create_dir(&library).unwrap();
        create_test_photo(&library, "a.jpeg");
        let snapshot_path = temp_dir.path().join("snapshot.json");

        let scan = Pipeline::builder()
            .paths(vec![library.clone()])
            .snapshot_path(snapshot_path.clone())
            .extractor(Box::new(StaticExtractor))
            .build();
        let scanned = scan.run().unwrap();

        let cached = Pipeline::builder()
            .use_snapshot(true)
            .snapshot_path(snapshot_path)
            .extractor(Box::new(StaticExtractor))
            .build();
        let result = cached.run().unwrap();

        assert!(result.from_snapshot);
        assert_eq!(result.records, scanned.records);
    }

    #[test]
    fn cached_run_without_snapshot_fails() {
        let temp_dir = TempDir::new().unwrap();

        let pipeline = Pipeline::builder()
            .use_snapshot(true)
            .snapshot_path(temp_dir.path().join("missing.json"))
            .extractor(Box::new(StaticExtractor))
            .build();

        let result = pipeline.run();

        assert!(matches!(
            result,
            Err(PhotoStatsError::Snapshot(SnapshotError::NotFound { .. }))
        ));
    }

    #[test]
    fn pipeline_handles_nonexistent_path() {
        let temp_dir = TempDir::new().unwrap();

        let pipeline = Pipeline::builder()
            .paths(vec![PathBuf::from("/nonexistent/path/that/does/not/exist")])
            .snapshot_path(temp_dir.path().join("snapshot.json"))
            .extractor(Box::new(StaticExtractor))
            .build();

        // Should not panic; the missing directory is a recorded scan error
        let result = pipeline.run().unwrap();

        assert_eq!(result.total_photos, 0);
        assert!(!result.scan_errors.is_empty());
    }
}
