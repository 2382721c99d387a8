//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the promptweave binary.

mod commands;
mod plan;
mod run;

pub use commands::{Cli, Commands};
pub use plan::plan_workflow;
pub use run::run_workflow;
