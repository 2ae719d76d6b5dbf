//! File filtering logic for the scanner.

use std::collections::HashSet;
use std::path::Path;

/// Filters files to determine if they are candidate photos
///
/// Extension matching is case-sensitive: a Photos library names its
/// originals `.jpeg`/`.heic` consistently, and files spelled otherwise
/// are someone else's exports with different metadata conventions.
pub struct PhotoFileFilter {
    /// File extensions to include, without the leading dot
    extensions: HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl PhotoFileFilter {
    /// Create a new filter with the default extensions
    pub fn new() -> Self {
        Self {
            extensions: ["jpeg", "heic"].iter().map(|e| e.to_string()).collect(),
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions.into_iter().collect();
        self
    }

    /// Check if a file should be passed to the extractor
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.contains(ext),
            None => false,
        }
    }
}

impl Default for PhotoFileFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_jpeg_and_heic() {
        let filter = PhotoFileFilter::new();
        assert!(filter.should_include(Path::new("/photos/image.jpeg")));
        assert!(filter.should_include(Path::new("/photos/IMG_1234.heic")));
    }

    #[test]
    fn filter_is_case_sensitive() {
        let filter = PhotoFileFilter::new();
        assert!(!filter.should_include(Path::new("/photos/image.JPEG")));
        assert!(!filter.should_include(Path::new("/photos/IMG_1234.HEIC")));
    }

    #[test]
    fn filter_excludes_unlisted_extensions() {
        let filter = PhotoFileFilter::new();
        assert!(!filter.should_include(Path::new("/photos/image.jpg")));
        assert!(!filter.should_include(Path::new("/photos/image.png")));
        assert!(!filter.should_include(Path::new("/photos/document.pdf")));
        assert!(!filter.should_include(Path::new("/photos/video.mp4")));
    }

    #[test]
    fn filter_extensions_can_be_overridden() {
        let filter =
            PhotoFileFilter::new().with_extensions(vec!["jpg".to_string(), "jpeg".to_string()]);
        assert!(filter.should_include(Path::new("/photos/image.jpg")));
        assert!(!filter.should_include(Path::new("/photos/IMG_1234.heic")));
    }

    #[test]
    fn filter_excludes_hidden_by_default() {
        let filter = PhotoFileFilter::new();
        assert!(!filter.should_include(Path::new("/photos/.hidden.jpeg")));
    }

    #[test]
    fn filter_can_include_hidden() {
        let filter = PhotoFileFilter::new().with_hidden(true);
        assert!(filter.should_include(Path::new("/photos/.hidden.jpeg")));
    }

    #[test]
    fn filter_handles_no_extension() {
        let filter = PhotoFileFilter::new();
        assert!(!filter.should_include(Path::new("/photos/no_extension")));
    }
}
