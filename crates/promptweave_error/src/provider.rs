//! Generation provider errors.

/// Specific error conditions for generation providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Model identifier carries no registered provider prefix
    #[display(
        "Unsupported model provider: {}. Model identifiers must be prefixed with a registered provider (e.g. 'openai/', 'anthropic/')",
        _0
    )]
    UnsupportedModel(String),
    /// Provider failed to generate
    #[display("Provider '{}' failed: {}", provider, message)]
    Generation {
        /// Provider prefix
        provider: String,
        /// Failure description
        message: String,
    },
    /// Provider stream broke mid-generation
    #[display("Provider '{}' stream failed: {}", provider, message)]
    Stream {
        /// Provider prefix
        provider: String,
        /// Failure description
        message: String,
    },
}

/// Error type for generation providers.
///
/// # Examples
///
/// ```
/// use promptweave_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::UnsupportedModel("gemini-pro".into()));
/// assert!(format!("{}", err).contains("Unsupported model provider"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The specific error condition
    pub kind: ProviderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
