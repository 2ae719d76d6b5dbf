//! Directory walking implementation using walkdir.

use super::{filter::PhotoFileFilter, PhotoFile, PhotoScanner, ScanResult};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: false,
            max_depth: None,
            extensions: None,
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: PhotoFileFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = PhotoFileFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    /// Scan a single directory
    fn scan_directory(
        &self,
        root: &PathBuf,
        events: Option<&EventSender>,
    ) -> Result<(Vec<PhotoFile>, Vec<ScanError>), ScanError> {
        if !root.exists() || !root.is_dir() {
            return Err(ScanError::DirectoryNotFound { path: root.clone() });
        }

        let mut photos = Vec::new();
        let mut errors = Vec::new();
        let mut directories_scanned = 0;

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    let path = entry.path();

                    if path.is_dir() {
                        directories_scanned += 1;

                        // Skip hidden directories unless configured otherwise
                        if !self.config.include_hidden {
                            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                                if name.starts_with('.') && path != root.as_path() {
                                    continue;
                                }
                            }
                        }

                        if let Some(sender) = events {
                            sender.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                                directories_scanned,
                                photos_found: photos.len(),
                                current_path: path.to_path_buf(),
                            })));
                        }

                        continue;
                    }

                    if !self.filter.should_include(path) {
                        continue;
                    }

                    match fs::metadata(path) {
                        Ok(metadata) => {
                            let photo = PhotoFile {
                                path: path.to_path_buf(),
                                size: metadata.len(),
                            };

                            if let Some(sender) = events {
                                sender.send(Event::Scan(ScanEvent::PhotoFound {
                                    path: photo.path.clone(),
                                }));
                            }

                            photos.push(photo);
                        }
                        Err(e) => {
                            let error = ScanError::ReadDirectory {
                                path: path.to_path_buf(),
                                source: e,
                            };

                            if let Some(sender) = events {
                                sender.send(Event::Scan(ScanEvent::Error {
                                    path: path.to_path_buf(),
                                    message: error.to_string(),
                                }));
                            }

                            errors.push(error);
                        }
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::new(
                                std::io::ErrorKind::Other,
                                e.to_string(),
                            ),
                        }
                    };

                    if let Some(sender) = events {
                        sender.send(Event::Scan(ScanEvent::Error {
                            path,
                            message: error.to_string(),
                        }));
                    }

                    errors.push(error);
                }
            }
        }

        Ok((photos, errors))
    }
}

impl PhotoScanner for WalkDirScanner {
    fn scan(&self, paths: &[PathBuf]) -> Result<ScanResult, ScanError> {
        self.scan_with_events(paths, &crate::events::null_sender())
    }

    fn scan_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        events.send(Event::Scan(ScanEvent::Started {
            paths: paths.to_vec(),
        }));

        let mut all_photos = Vec::new();
        let mut all_errors = Vec::new();

        for path in paths {
            match self.scan_directory(path, Some(events)) {
                Ok((photos, errors)) => {
                    all_photos.extend(photos);
                    all_errors.extend(errors);
                }
                Err(e) => {
                    all_errors.push(e);
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_photos: all_photos.len(),
        }));

        Ok(ScanResult {
            photos: all_photos,
            errors: all_errors,
        })
    }
}
