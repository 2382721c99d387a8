//! Workflow runtime for promptweave.
//!
//! Executes the step lists produced by `promptweave_compiler` as a
//! control-flow graph: PROMPT steps call a generation provider (or a
//! simulation of one), AFTER steps steer the run with `GOTO`/`DONE`.
//!
//! # Example
//!
//! ```rust,ignore
//! use promptweave_core::{RunMode, StreamMode};
//! use promptweave_runtime::{RuntimeConfig, WorkflowRunner};
//!
//! let runner = WorkflowRunner::simulation(RuntimeConfig::load()?);
//! let final_state = runner
//!     .run(&steps, input, &mut |event| println!("{}", event.kind()), RunMode::Simulation, StreamMode::Stream)
//!     .await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod provider;
mod runner;

pub use config::{RuntimeConfig, RuntimeSettings, SimulationSettings};
pub use provider::ProviderRegistry;
pub use runner::{WorkflowRunner, comparator_key};
