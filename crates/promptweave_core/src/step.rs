//! Compiled workflow steps.

use crate::{Instruction, VariableMap};
use serde::{Deserialize, Serialize};

/// One compiled, named unit of a workflow.
///
/// Steps are produced once per planning pass and treated as immutable data
/// afterwards. A workflow is an ordered list of steps addressed by
/// `(name, instruction)`.
///
/// # Examples
///
/// ```
/// use promptweave_core::{Instruction, Step};
///
/// let step = Step::builder()
///     .name("write")
///     .instruction(Instruction::After)
///     .template_text("{% done %}")
///     .build()
///     .unwrap();
///
/// assert_eq!(step.name(), "write");
/// assert!(step.error().is_none());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
pub struct Step {
    /// Label of the preceding marker (may be empty)
    name: String,
    /// PROMPT or AFTER
    instruction: Instruction,
    /// Template body as rendered (including injected test hooks)
    template_text: String,
    /// Caller input the body was rendered with
    input_values: VariableMap,
    /// Variables written by directives during rendering
    output_values: VariableMap,
    /// Rendered prompt text, trimmed
    rendered_prompt: String,
    /// Render failure, if any
    #[builder(setter(into, strip_option))]
    error: Option<String>,
}

impl Step {
    /// Creates a new step builder.
    pub fn builder() -> StepBuilder {
        StepBuilder::default()
    }

    /// Creates a step from all of its parts.
    pub fn new(
        name: impl Into<String>,
        instruction: Instruction,
        template_text: impl Into<String>,
        input_values: VariableMap,
        output_values: VariableMap,
        rendered_prompt: impl Into<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction,
            template_text: template_text.into(),
            input_values,
            output_values,
            rendered_prompt: rendered_prompt.into(),
            error,
        }
    }

    /// Looks up one output variable.
    pub fn output(&self, key: &str) -> Option<&serde_json::Value> {
        self.output_values.get(key)
    }

    /// Returns true for PROMPT steps.
    pub fn is_prompt(&self) -> bool {
        self.instruction == Instruction::Prompt
    }
}
