//! Workflow planning command handler.

use super::commands::{PlanArgs, SourceArgs};
use promptweave::{
    ConfigError, FileCorpusRetriever, IoError, JsonError, PlanOptions, PlanResult,
    PromptweaveError, PromptweaveResult, control_flow, input_map, plan,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Compile a workflow file and print the plan.
#[instrument(skip_all, fields(file = %args.source.file.display()))]
pub async fn plan_workflow(args: PlanArgs) -> PromptweaveResult<()> {
    let result = compile(&args.source).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| JsonError::new(format!("Plan is not serializable: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    for (i, step) in result.steps().iter().enumerate() {
        let name = if step.name().is_empty() {
            "(unnamed)"
        } else {
            step.name().as_str()
        };
        println!("{}. {} {}", i + 1, step.instruction(), name);
        for line in step.rendered_prompt().lines() {
            println!("   | {line}");
        }
        if let Some(error) = step.error() {
            println!("   ! {error}");
        }
    }

    if !result.output().is_empty() {
        println!();
        println!("Output variables:");
        for (key, value) in result.output() {
            println!("  {key} = {value}");
        }
    }

    Ok(())
}

/// Read and plan the workflow named by `source`.
pub(super) async fn compile(source: &SourceArgs) -> PromptweaveResult<PlanResult> {
    let text = tokio::fs::read_to_string(&source.file)
        .await
        .map_err(|e| IoError::read(&source.file, &e))?;
    let input = input_map(source.inputs.iter().cloned());
    let options = plan_options(source.mock.clone())?;

    let result = plan(&text, &input, &options).await;
    info!(
        steps = result.steps().len(),
        errors = result.errors().len(),
        "Workflow compiled"
    );
    for error in result.errors() {
        eprintln!("warning: {error}");
    }
    Ok(result)
}

/// Directives and collaborators available to CLI workflows.
fn plan_options(mock: Option<String>) -> PromptweaveResult<PlanOptions> {
    let mut builder = PlanOptions::builder();
    builder.retriever(Arc::new(FileCorpusRetriever::new()));

    if let Some(text) = mock {
        builder.sync_tag(promptweave::MOCK_TAG, move |call| {
            call.context
                .set_output(control_flow::RESULT, Value::String(text.clone()));
            Ok(None)
        });
    }

    builder.build().map_err(|e| {
        PromptweaveError::from(ConfigError::new(format!("Invalid plan options: {}", e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptweave::PromptweaveErrorKind;
    use std::io::Write;

    fn source(file: std::path::PathBuf) -> SourceArgs {
        SourceArgs {
            file,
            inputs: Vec::new(),
            mock: None,
        }
    }

    #[tokio::test]
    async fn unreadable_workflow_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.liquid");

        let err = compile(&source(missing)).await.unwrap_err();

        assert!(matches!(err.kind(), PromptweaveErrorKind::Io(_)));
        assert!(err.message().starts_with("Failed to read "));
        assert!(err.message().contains("absent.liquid"));
    }

    #[tokio::test]
    async fn readable_workflow_compiles() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "--- PROMPT hello ---\nSay hi.").unwrap();

        let result = compile(&source(file.path().to_path_buf())).await.unwrap();

        assert_eq!(result.steps().len(), 1);
        assert_eq!(result.steps()[0].rendered_prompt(), "Say hi.");
    }
}
