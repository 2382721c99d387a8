//! Turns template source into a compiled step list.

use crate::PlanOptions;
use crate::dialect::TagRegistry;
use crate::renderer::StepRenderer;
use crate::segmenter::segment;
use promptweave_core::{Step, TemplateSegment, VariableMap};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Test hook run before every step body.
pub const INPUT_MOCK_TAG: &str = "inputMock";

/// Test hook run after every step body.
pub const MOCK_TAG: &str = "mock";

static INPUT_MOCK_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{%-?\s*inputMock(?:\s|-?%\})").expect("Valid inputMock regex")
});

static MOCK_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%-?\s*mock(?:\s|-?%\})").expect("Valid mock regex"));

/// Result of a planning pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_getters::Getters)]
pub struct PlanResult {
    /// Compiled steps in document order
    steps: Vec<Step>,
    /// Non-empty step render errors, in step order
    errors: Vec<String>,
    /// Shallow merge of every step's outputs; later steps win
    output: VariableMap,
}

impl PlanResult {
    /// Consume the result, keeping the steps.
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    /// Whether any step failed to render.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Compile template source into steps.
///
/// Each non-empty body becomes a step named and classified by the closest
/// preceding marker (`""`/PROMPT when there is none) and is rendered with
/// `input`. When the caller supplies sync `inputMock`/`mock` directives,
/// bodies that do not call them get implicit invocations. Planning never
/// fails; render errors are collected per step.
///
/// # Examples
///
/// ```
/// use promptweave_compiler::{PlanOptions, plan};
/// use promptweave_core::{Instruction, VariableMap};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let source = "--- PROMPT write ---\nWrite a story.\n--- AFTER write ---\n{% done %}";
/// let result = plan(source, &VariableMap::new(), &PlanOptions::default()).await;
///
/// assert_eq!(result.steps().len(), 2);
/// assert_eq!(*result.steps()[1].instruction(), Instruction::After);
/// assert!(result.errors().is_empty());
/// # });
/// ```
#[tracing::instrument(skip(source, input, options), fields(source_len = source.len()))]
pub async fn plan(source: &str, input: &VariableMap, options: &PlanOptions) -> PlanResult {
    let registry = TagRegistry::for_options(options);
    let renderer = StepRenderer::new(&registry, options);
    let mut steps = Vec::new();

    for segment in segment(source) {
        let TemplateSegment::Body {
            instruction,
            label,
            text,
        } = segment
        else {
            continue;
        };

        if text.trim().is_empty() {
            tracing::debug!(step = %label, "Skipping empty body");
            continue;
        }

        let instruction = instruction.unwrap_or_default();
        let template_text = inject_mocks(&text, options);
        let rendered = renderer
            .render(&label, instruction, &template_text, input)
            .await;

        steps.push(Step::new(
            label,
            instruction,
            template_text,
            input.clone(),
            rendered.output_values,
            rendered.prompt,
            rendered.error,
        ));
    }

    let errors: Vec<String> = steps.iter().filter_map(|s| s.error().clone()).collect();
    let output = steps.iter().fold(VariableMap::new(), |mut acc, step| {
        acc.extend(step.output_values().clone());
        acc
    });

    tracing::info!(steps = steps.len(), errors = errors.len(), "Planned workflow");
    PlanResult {
        steps,
        errors,
        output,
    }
}

/// Wrap `body` with the caller's test hooks unless it already calls them.
fn inject_mocks(body: &str, options: &PlanOptions) -> String {
    let mut text = body.to_string();
    if options.sync_tags().contains_key(INPUT_MOCK_TAG) && !INPUT_MOCK_CALL.is_match(&text) {
        text = format!("{{% {INPUT_MOCK_TAG} %}}\n{text}");
    }
    if options.sync_tags().contains_key(MOCK_TAG) && !MOCK_CALL.is_match(&text) {
        text = format!("{text}\n{{% {MOCK_TAG} %}}");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_hooks() -> PlanOptions {
        PlanOptions::builder()
            .sync_tag(INPUT_MOCK_TAG, |_| Ok(None))
            .sync_tag(MOCK_TAG, |_| Ok(None))
            .build()
            .unwrap()
    }

    #[test]
    fn hooks_wrap_bodies() {
        assert_eq!(
            inject_mocks("Write.", &with_hooks()),
            "{% inputMock %}\nWrite.\n{% mock %}"
        );
    }

    #[test]
    fn explicit_hook_calls_are_not_duplicated() {
        let body = "{% INPUTMOCK %}\nWrite.\n{%- mock -%}";
        assert_eq!(inject_mocks(body, &with_hooks()), body);
    }

    #[test]
    fn similarly_named_tags_do_not_count() {
        let body = "{% mockery %}";
        assert_eq!(
            inject_mocks(body, &with_hooks()),
            "{% inputMock %}\n{% mockery %}\n{% mock %}"
        );
    }

    #[test]
    fn no_hooks_without_caller_directives() {
        assert_eq!(inject_mocks("Write.", &PlanOptions::default()), "Write.");
    }
}
