//! Workflow lifecycle events.

use crate::{GenerationResponse, VariableMap};
use serde::{Deserialize, Serialize};

/// Name of a lifecycle event, as it appears on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// A PROMPT step is about to run
    StepBefore,
    /// An AFTER step is about to run or has evaluated its control flow
    StepAfter,
    /// A PROMPT step produced its full result
    StepResultChunk,
    /// One streamed token
    StepResultStream,
    /// A step failed; the run terminates
    StepError,
    /// The run finished
    WorkflowDone,
}

/// Shape of a generation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResultFormat {
    /// Plain text
    #[default]
    Text,
    /// Structured JSON
    Json,
}

/// Generated output of a PROMPT step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Result format
    pub format: ResultFormat,
    /// Generated text
    pub text: String,
    /// Structured view of the raw response
    pub json: serde_json::Value,
}

/// Payload of `STEP_RESULT_CHUNK`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepExecutionResult {
    /// The generated result
    pub result: GenerationResult,
    /// Raw provider response
    pub response: GenerationResponse,
}

impl StepExecutionResult {
    /// Wraps a provider response as a text result.
    pub fn from_response(response: GenerationResponse) -> Self {
        let json = serde_json::to_value(&response).unwrap_or(serde_json::Value::Null);
        Self {
            result: GenerationResult {
                format: ResultFormat::Text,
                text: response.text.clone(),
                json,
            },
            response,
        }
    }
}

/// An event emitted by the workflow runtime.
///
/// Events are delivered synchronously in program order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowEvent {
    /// A PROMPT step is about to run.
    StepBefore {
        /// Step name
        step: String,
    },
    /// An AFTER step is about to run (`state` absent) or has evaluated
    /// (`state` present).
    StepAfter {
        /// Step name
        step: String,
        /// Combined state the step saw
        #[serde(skip_serializing_if = "Option::is_none")]
        state: Option<VariableMap>,
    },
    /// A PROMPT step produced its full result.
    StepResultChunk(StepExecutionResult),
    /// One streamed token.
    StepResultStream {
        /// Token text
        token: String,
    },
    /// A step failed; the run terminates.
    StepError {
        /// Failure description
        error: String,
        /// Step that failed
        step: String,
    },
    /// The run finished.
    WorkflowDone {
        /// State at termination
        final_state: VariableMap,
        /// Set when the run could not start
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl WorkflowEvent {
    /// The event's wire name.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StepBefore { .. } => EventKind::StepBefore,
            Self::StepAfter { .. } => EventKind::StepAfter,
            Self::StepResultChunk(_) => EventKind::StepResultChunk,
            Self::StepResultStream { .. } => EventKind::StepResultStream,
            Self::StepError { .. } => EventKind::StepError,
            Self::WorkflowDone { .. } => EventKind::WorkflowDone,
        }
    }
}
