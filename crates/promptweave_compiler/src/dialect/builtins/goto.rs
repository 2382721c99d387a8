use crate::dialect::TagCall;
use promptweave_core::control_flow;
use promptweave_error::{DirectiveError, DirectiveErrorKind, PromptweaveResult};
use serde_json::Value;

/// `{% goto target %}`: jump to the step labelled `target`.
///
/// The target is the name of the first argument, not its value.
pub(crate) fn goto(call: TagCall<'_>) -> PromptweaveResult<Option<String>> {
    let target = call.arguments.first_key().ok_or_else(|| {
        DirectiveError::new(DirectiveErrorKind::MissingArgument {
            tag: call.name.to_string(),
            argument: "target".to_string(),
        })
    })?;
    tracing::debug!(step = %call.context.step_name(), goto_target = target, "goto");
    call.context
        .set_output(control_flow::GOTO, Value::String(target.to_string()));
    Ok(None)
}
