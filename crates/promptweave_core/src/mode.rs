//! Execution modes.

use serde::{Deserialize, Serialize};

/// Whether PROMPT steps call a real provider.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RunMode {
    /// Never call a provider; use mocked `CONTROL_FLOW_RESULT` or a placeholder.
    Simulation,
    /// Call the provider resolved from the step's model identifier.
    #[default]
    Execution,
}

/// How generated text is delivered to the observer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StreamMode {
    /// Per-token `STEP_RESULT_STREAM` events as text arrives.
    Stream,
    /// One `STEP_RESULT_CHUNK` once the full text is known.
    #[default]
    Blocking,
}
