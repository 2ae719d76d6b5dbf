//! # Extractor Module
//!
//! Reads raw metadata tags from photo files by shelling out to `exiftool`.
//!
//! ## Boundary
//! Extraction is the one external dependency of the pipeline. Everything the
//! tool reports comes back as an untyped [`RawTagSet`]; typing the values is
//! the normalizer's job. Every failure mode here (tool missing, unreadable
//! file, corrupt image, hung invocation) is a per-file error that the
//! collector catches - one bad file never aborts a scan.
//!
//! ## Timeout
//! exiftool is invoked synchronously once per file, with a bounded wait.
//! A file that exceeds the budget is killed and skipped.

use crate::error::ExtractError;
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

/// Raw tag name/value mapping for one file, as reported by `exiftool -j`
pub type RawTagSet = serde_json::Map<String, serde_json::Value>;

/// Default per-file extraction budget
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for raw tag extractors
///
/// Implement this trait to substitute the exiftool boundary (e.g., for
/// testing the collector without the external tool installed).
pub trait TagExtractor: Send + Sync {
    /// Extract the raw tag set for one file
    fn extract(&self, path: &Path) -> Result<RawTagSet, ExtractError>;
}

/// Extractor that invokes the external `exiftool` program
pub struct ExifToolExtractor {
    command: String,
    timeout: Duration,
}

impl ExifToolExtractor {
    /// Create an extractor using `exiftool` from PATH and the default timeout
    pub fn new() -> Self {
        Self {
            command: "exiftool".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a specific exiftool binary
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Override the per-file timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run exiftool and collect its stdout, enforcing the timeout
    fn run_tool(&self, path: &Path) -> Result<Vec<u8>, ExtractError> {
        let mut child = Command::new(&self.command)
            .arg("-j")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ExtractError::Launch {
                tool: self.command.clone(),
                source: e,
            })?;

        // stdout is drained on a helper thread so the main thread can keep
        // a handle on the child and kill it if the budget runs out.
        let mut stdout = child.stdout.take().expect("stdout was piped");
        let (tx, rx) = bounded(1);
        thread::spawn(move || {
            let mut buf = Vec::new();
            let result = stdout.read_to_end(&mut buf).map(|_| buf);
            let _ = tx.send(result);
        });

        let output = match rx.recv_timeout(self.timeout) {
            Ok(Ok(buf)) => buf,
            Ok(Err(e)) => {
                let _ = child.wait();
                return Err(ExtractError::MalformedOutput {
                    path: path.to_path_buf(),
                    reason: format!("failed to read output: {}", e),
                });
            }
            Err(RecvTimeoutError::Timeout) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ExtractError::Timeout {
                    path: path.to_path_buf(),
                    seconds: self.timeout.as_secs(),
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ExtractError::MalformedOutput {
                    path: path.to_path_buf(),
                    reason: "output reader disappeared".to_string(),
                });
            }
        };

        let status = child.wait().map_err(|e| ExtractError::Launch {
            tool: self.command.clone(),
            source: e,
        })?;

        if !status.success() {
            return Err(ExtractError::ToolFailed {
                path: path.to_path_buf(),
                status: status.to_string(),
            });
        }

        Ok(output)
    }

    /// Parse `exiftool -j` output: a JSON array with one object per file
    fn parse_output(path: &Path, output: &[u8]) -> Result<RawTagSet, ExtractError> {
        let value: serde_json::Value =
            serde_json::from_slice(output).map_err(|e| ExtractError::MalformedOutput {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let first = value
            .as_array()
            .and_then(|entries| entries.first())
            .ok_or_else(|| ExtractError::MalformedOutput {
                path: path.to_path_buf(),
                reason: "expected a non-empty JSON array".to_string(),
            })?;

        match first.as_object() {
            Some(tags) => Ok(tags.clone()),
            None => Err(ExtractError::MalformedOutput {
                path: path.to_path_buf(),
                reason: "expected a JSON object per file".to_string(),
            }),
        }
    }
}

impl Default for ExifToolExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TagExtractor for ExifToolExtractor {
    fn extract(&self, path: &Path) -> Result<RawTagSet, ExtractError> {
        let output = self.run_tool(path)?;
        let tags = Self::parse_output(path, &output)?;
        tracing::debug!(path = %path.display(), tags = tags.len(), "extracted raw tags");
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_output_takes_first_array_element() {
        let output = br#"[{"SourceFile": "/a.jpeg", "Model": "X-T4", "ISO": 400}]"#;
        let tags = ExifToolExtractor::parse_output(Path::new("/a.jpeg"), output).unwrap();

        assert_eq!(tags.get("Model").unwrap(), "X-T4");
        assert_eq!(tags.get("ISO").unwrap(), 400);
    }

    #[test]
    fn parse_output_rejects_empty_array() {
        let result = ExifToolExtractor::parse_output(Path::new("/a.jpeg"), b"[]");
        assert!(matches!(
            result,
            Err(ExtractError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn parse_output_rejects_non_array() {
        let result = ExifToolExtractor::parse_output(Path::new("/a.jpeg"), b"{\"Model\": 1}");
        assert!(matches!(
            result,
            Err(ExtractError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn parse_output_rejects_non_object_element() {
        let result = ExifToolExtractor::parse_output(Path::new("/a.jpeg"), b"[42]");
        assert!(matches!(
            result,
            Err(ExtractError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn parse_output_rejects_garbage() {
        let result = ExifToolExtractor::parse_output(Path::new("/a.jpeg"), b"not json");
        assert!(matches!(
            result,
            Err(ExtractError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn missing_tool_reports_launch_error() {
        let extractor = ExifToolExtractor::new().with_command("exiftool-does-not-exist-12345");
        let result = extractor.extract(&PathBuf::from("/tmp/whatever.jpeg"));

        assert!(matches!(result, Err(ExtractError::Launch { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn hung_tool_is_killed_after_timeout() {
        use std::os::unix::fs::PermissionsExt;

        // A stub that ignores its arguments and hangs stands in for a
        // wedged exiftool.
        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("slow-exiftool");
        std::fs::write(&script, "#!/bin/sh\nsleep 30\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let extractor = ExifToolExtractor::new()
            .with_command(script.to_string_lossy().into_owned())
            .with_timeout(Duration::from_millis(100));

        let result = extractor.extract(Path::new("/tmp/whatever.jpeg"));

        assert!(matches!(result, Err(ExtractError::Timeout { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_reports_status() {
        let extractor = ExifToolExtractor::new().with_command("false");
        let result = extractor.extract(Path::new("/tmp/whatever.jpeg"));

        assert!(matches!(result, Err(ExtractError::ToolFailed { .. })));
    }
}
