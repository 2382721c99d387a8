//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use promptweave::{LogFormat, parse_input};
use serde_json::Value;
use std::path::PathBuf;

/// Promptweave - compile Liquid prompt templates into LLM workflows
#[derive(Parser, Debug)]
#[command(name = "promptweave")]
#[command(about = "Compile Liquid prompt templates into LLM workflows and run them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a workflow file and print its steps
    Plan(PlanArgs),

    /// Run a workflow file in simulation mode
    Run(RunArgs),
}

/// Arguments shared by every command that compiles a workflow.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Path to the workflow template
    pub file: PathBuf,

    /// Input variable as key=value (repeatable; values are JSON when they parse)
    #[arg(short, long = "input", value_parser = parse_input)]
    pub inputs: Vec<(String, Value)>,

    /// Text every PROMPT step pretends to generate
    #[arg(long)]
    pub mock: Option<String>,
}

/// Arguments for `plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Stream generated text token by token
    #[arg(long)]
    pub stream: bool,

    /// Configuration file (defaults to ./promptweave.toml, then
    /// ~/.config/promptweave/promptweave.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
