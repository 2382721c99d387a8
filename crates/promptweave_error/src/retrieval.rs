//! Example retrieval errors.

/// Specific error conditions for example retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RetrievalErrorKind {
    /// The corpus directory does not exist
    #[display("Example corpus not found: {}", _0)]
    CorpusNotFound(String),
    /// Reading the corpus failed
    #[display("Failed to read '{}': {}", path, message)]
    Io {
        /// Offending path
        path: String,
        /// I/O error message
        message: String,
    },
}

/// Error type for example retrieval.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Retrieval Error: {} at line {} in {}", kind, line, file)]
pub struct RetrievalError {
    /// The specific error condition
    pub kind: RetrievalErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RetrievalError {
    /// Create a new RetrievalError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RetrievalErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
