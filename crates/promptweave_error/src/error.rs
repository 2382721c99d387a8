//! Top-level error wrapper types.

use crate::{
    ConfigError, DirectiveError, IoError, JsonError, ProviderError, RetrievalError, RuntimeError,
    TemplateError,
};

/// The foundation error enum covering every promptweave subsystem.
///
/// # Examples
///
/// ```
/// use promptweave_error::{PromptweaveError, ConfigError};
///
/// let config_err = ConfigError::new("bad temperature");
/// let err: PromptweaveError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PromptweaveErrorKind {
    /// Template syntax or render error
    #[from(TemplateError)]
    Template(TemplateError),
    /// Directive implementation error
    #[from(DirectiveError)]
    Directive(DirectiveError),
    /// Generation provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Workflow runtime error
    #[from(RuntimeError)]
    Runtime(RuntimeError),
    /// Example retrieval error
    #[from(RetrievalError)]
    Retrieval(RetrievalError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization error
    #[from(JsonError)]
    Json(JsonError),
    /// File system error
    #[from(IoError)]
    Io(IoError),
}

/// Promptweave error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Promptweave Error: {}", _0)]
pub struct PromptweaveError(Box<PromptweaveErrorKind>);

impl PromptweaveError {
    /// Create a new error from a kind.
    pub fn new(kind: PromptweaveErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PromptweaveErrorKind {
        &self.0
    }

    /// The underlying condition without source location, for user-facing
    /// reporting (events, step errors).
    pub fn message(&self) -> String {
        match self.kind() {
            PromptweaveErrorKind::Template(e) => e.kind.to_string(),
            PromptweaveErrorKind::Directive(e) => e.kind.to_string(),
            PromptweaveErrorKind::Provider(e) => e.kind.to_string(),
            PromptweaveErrorKind::Runtime(e) => e.kind.to_string(),
            PromptweaveErrorKind::Retrieval(e) => e.kind.to_string(),
            PromptweaveErrorKind::Config(e) => e.message.clone(),
            PromptweaveErrorKind::Json(e) => e.message.clone(),
            PromptweaveErrorKind::Io(e) => e.message.clone(),
        }
    }
}

// Generic From implementation for any type that converts to PromptweaveErrorKind
impl<T> From<T> for PromptweaveError
where
    T: Into<PromptweaveErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for promptweave operations.
pub type PromptweaveResult<T> = std::result::Result<T, PromptweaveError>;
