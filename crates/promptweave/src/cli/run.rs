//! Workflow execution command handler.

use super::commands::RunArgs;
use super::plan::compile;
use promptweave::{
    JsonError, PromptweaveResult, RunMode, RuntimeConfig, StreamMode, VariableMap, WorkflowEvent,
    WorkflowRunner, input_map,
};
use std::io::Write;
use tracing::{info, instrument};

/// Run a workflow file in simulation mode, printing events as they arrive.
#[instrument(skip_all, fields(file = %args.source.file.display(), stream = args.stream))]
pub async fn run_workflow(args: RunArgs) -> PromptweaveResult<()> {
    let config = match &args.config {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::load()?,
    };
    let planned = compile(&args.source).await?;
    let initial_state: VariableMap = input_map(args.source.inputs.iter().cloned());
    let stream_mode = if args.stream {
        StreamMode::Stream
    } else {
        StreamMode::Blocking
    };

    let runner = WorkflowRunner::simulation(config);
    let mut observer = |event: WorkflowEvent| print_event(&event, stream_mode);
    let final_state = runner
        .run(
            planned.steps(),
            initial_state,
            &mut observer,
            RunMode::Simulation,
            stream_mode,
        )
        .await;

    info!(keys = final_state.len(), "Run finished");
    println!();
    println!("Final state:");
    let rendered = serde_json::to_string_pretty(&final_state)
        .map_err(|e| JsonError::new(format!("Final state is not serializable: {e}")))?;
    println!("{rendered}");
    Ok(())
}

fn print_event(event: &WorkflowEvent, stream_mode: StreamMode) {
    match event {
        WorkflowEvent::StepBefore { step } => println!("\n[PROMPT {step}]"),
        WorkflowEvent::StepAfter { step, state: None } => println!("\n[AFTER {step}]"),
        WorkflowEvent::StepAfter { state: Some(_), .. } => {}
        WorkflowEvent::StepResultStream { token } => {
            print!("{token}");
            let _ = std::io::stdout().flush();
        }
        WorkflowEvent::StepResultChunk(result) => match stream_mode {
            StreamMode::Stream => println!(),
            StreamMode::Blocking => println!("{}", result.result.text),
        },
        WorkflowEvent::StepError { error, step } => eprintln!("error in step '{step}': {error}"),
        WorkflowEvent::WorkflowDone {
            error: Some(error), ..
        } => eprintln!("workflow not run: {error}"),
        WorkflowEvent::WorkflowDone { error: None, .. } => {}
    }
}
