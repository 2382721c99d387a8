//! Reserved variable names.
//!
//! Directives and the runtime communicate exclusively through these keys in
//! a step's output values and the workflow state.

/// Target step name set by `{% goto name %}`.
pub const GOTO: &str = "CONTROL_FLOW_GOTO";

/// Termination flag set by `{% done %}`.
pub const DONE: &str = "CONTROL_FLOW_DONE";

/// Generated text (mocked in simulation, real in execution).
pub const RESULT: &str = "CONTROL_FLOW_RESULT";

/// Field metadata registry written by `{% field %}`.
pub const PROMPT_FIELDS: &str = "PROMPT_FIELDS";

/// Per-step model override.
pub const MODEL: &str = "model";

/// Per-step temperature override.
pub const TEMPERATURE: &str = "temperature";

/// Text of the most recent generation.
pub const PREV_GENERATION_TEXT: &str = "prev_generation_text";

/// Character count of the most recent generation.
pub const PREV_GENERATION_CHARS: &str = "prev_generation_chars";

/// Wall time of the most recent generation in milliseconds.
pub const PREV_GENERATION_TIME_MS: &str = "prev_generation_time_ms";
