//! Template parsing and rendering errors.

/// Specific error conditions raised while compiling a step body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TemplateErrorKind {
    /// Source the Liquid parser rejected, including unknown tags
    #[display("Template syntax error: {}", _0)]
    Syntax(String),
    /// Directive arguments that do not follow `key=value` syntax
    #[display("Invalid arguments for tag '{}': {}", tag, message)]
    Arguments {
        /// Directive name
        tag: String,
        /// Parser diagnostic
        message: String,
    },
    /// Failure while producing output
    #[display("Render failed: {}", _0)]
    Render(String),
}

/// Error type for template operations.
///
/// # Examples
///
/// ```
/// use promptweave_error::{TemplateError, TemplateErrorKind};
///
/// let err = TemplateError::new(TemplateErrorKind::Render("Unknown variable".into()));
/// assert!(format!("{}", err).contains("Unknown variable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {} at line {} in {}", kind, line, file)]
pub struct TemplateError {
    /// The specific error condition
    pub kind: TemplateErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new TemplateError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TemplateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
