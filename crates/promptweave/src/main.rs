//! Promptweave CLI binary.
//!
//! - `plan` compiles a workflow file and prints its steps
//! - `run` executes a workflow in simulation mode and prints its events

use clap::Parser;
use promptweave::init_logging;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use cli::{Cli, Commands, plan_workflow, run_workflow};

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    init_logging(cli.log_format, log_level)?;

    match cli.command {
        Commands::Plan(args) => plan_workflow(args).await?,
        Commands::Run(args) => run_workflow(args).await?,
    }

    Ok(())
}
