//! Workflow runtime errors.

/// Specific error conditions for workflow execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RuntimeErrorKind {
    /// The compiled workflow has no PROMPT step to start from
    #[display("No PROMPT steps found in workflow")]
    NoPromptStep,
    /// A GOTO named a step that does not exist
    #[display("Could not find next step: {}", _0)]
    StepNotFound(String),
    /// The run executed more steps than allowed
    #[display("Step limit of {} exceeded", _0)]
    StepLimitExceeded(usize),
}

/// Error type for workflow execution.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Runtime Error: {} at line {} in {}", kind, line, file)]
pub struct RuntimeError {
    /// The specific error condition
    pub kind: RuntimeErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RuntimeError {
    /// Create a new RuntimeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RuntimeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
