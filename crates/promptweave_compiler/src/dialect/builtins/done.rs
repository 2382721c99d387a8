use crate::dialect::TagCall;
use promptweave_core::control_flow;
use promptweave_error::PromptweaveResult;
use serde_json::Value;

/// `{% done %}`: end the workflow after this step.
pub(crate) fn done(call: TagCall<'_>) -> PromptweaveResult<Option<String>> {
    tracing::debug!(step = %call.context.step_name(), "done");
    call.context.set_output(control_flow::DONE, Value::Bool(true));
    Ok(None)
}
