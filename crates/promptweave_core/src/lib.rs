//! Core data types for promptweave.
//!
//! This crate provides the data model shared by the compiler and the
//! runtime: instructions, template segments, compiled steps, the variable
//! maps threaded through a workflow, and the lifecycle events a run emits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod event;
mod instruction;
mod mode;
mod response;
mod segment;
mod step;
mod telemetry;
mod variables;

pub mod control_flow;

pub use event::{EventKind, GenerationResult, ResultFormat, StepExecutionResult, WorkflowEvent};
pub use instruction::Instruction;
pub use mode::{RunMode, StreamMode};
pub use response::{GenerationResponse, TokenUsage};
pub use segment::TemplateSegment;
pub use step::{Step, StepBuilder, StepBuilderError};
pub use telemetry::{LogFormat, init_logging};
pub use variables::{VariableMap, is_truthy, value_to_text};
