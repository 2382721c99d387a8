//! Renders one step body through the dialect-extended engine.

use crate::PlanOptions;
use crate::dialect::{TagContext, TagRegistry, render_step};
use promptweave_core::{Instruction, VariableMap};

/// Outcome of rendering one step body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedStep {
    /// Rendered prompt, trimmed
    pub prompt: String,
    /// Variables written by directives
    pub output_values: VariableMap,
    /// `In {INSTRUCTION}, {name}: {message}` when rendering failed
    pub error: Option<String>,
}

/// Renders step bodies against one directive registry.
#[derive(Debug, Clone, Copy)]
pub struct StepRenderer<'a> {
    registry: &'a TagRegistry,
    options: &'a PlanOptions,
}

impl<'a> StepRenderer<'a> {
    /// Renderer over `registry`; directives receive `options`.
    pub fn new(registry: &'a TagRegistry, options: &'a PlanOptions) -> Self {
        Self { registry, options }
    }

    /// Render `body` with a fresh context.
    ///
    /// Never fails: errors are reported in [`RenderedStep::error`], and the
    /// outputs written before the failure are kept.
    #[tracing::instrument(skip_all, fields(step = step_name, instruction = %instruction))]
    pub async fn render(
        &self,
        step_name: &str,
        instruction: Instruction,
        body: &str,
        input: &VariableMap,
    ) -> RenderedStep {
        let mut context = TagContext::new(step_name, input.clone());
        match render_step(self.registry, self.options, &mut context, body).await {
            Ok(text) => RenderedStep {
                prompt: text.trim().to_string(),
                output_values: context.into_output(),
                error: None,
            },
            Err(e) => {
                let error = format!("In {instruction}, {step_name}: {}", e.message());
                tracing::warn!(error = %error, "Step failed to render");
                RenderedStep {
                    prompt: String::new(),
                    output_values: context.into_output(),
                    error: Some(error),
                }
            }
        }
    }
}
