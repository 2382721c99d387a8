//! File system error types.

use std::path::Path;

/// Failure to read or write a file, with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("IO Error: {} at line {} in {}", message, line, file)]
pub struct IoError {
    /// What failed, including the path involved
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl IoError {
    /// Create a new IoError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Describe a failed read of `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use promptweave_error::IoError;
    ///
    /// let source = std::io::Error::from(std::io::ErrorKind::NotFound);
    /// let err = IoError::read("story.liquid", &source);
    /// assert!(err.message.starts_with("Failed to read story.liquid"));
    /// ```
    #[track_caller]
    pub fn read(path: impl AsRef<Path>, source: &std::io::Error) -> Self {
        Self::new(format!(
            "Failed to read {}: {}",
            path.as_ref().display(),
            source
        ))
    }
}
