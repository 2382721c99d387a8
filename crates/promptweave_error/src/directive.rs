//! Directive (tag) errors.

/// Specific error conditions raised inside directive implementations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DirectiveErrorKind {
    /// A `field` declaration whose spec could not be understood
    #[display("Invalid spec for field '{}': {}", field, message)]
    InvalidFieldSpec {
        /// Field name
        field: String,
        /// Parser message
        message: String,
    },
    /// A directive was invoked without an argument it needs
    #[display("Tag '{}' requires argument '{}'", tag, argument)]
    MissingArgument {
        /// Directive name
        tag: String,
        /// Argument name
        argument: String,
    },
    /// A directive collaborator (e.g. the example retriever) failed
    #[display("Tag '{}' failed: {}", tag, message)]
    Failed {
        /// Directive name
        tag: String,
        /// Failure description
        message: String,
    },
}

/// Error type for directive invocations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Directive Error: {} at line {} in {}", kind, line, file)]
pub struct DirectiveError {
    /// The specific error condition
    pub kind: DirectiveErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl DirectiveError {
    /// Create a new DirectiveError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DirectiveErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
