//! Variable maps threaded through planning and execution.

use serde_json::Value;

/// String-keyed JSON values: step inputs, step outputs and workflow state.
pub type VariableMap = serde_json::Map<String, Value>;

/// Loose truthiness used for control-flow flags and field defaults.
///
/// `null`, `false`, `0` and the empty string are falsy; everything else
/// (including empty arrays and objects) is truthy.
///
/// # Examples
///
/// ```
/// use promptweave_core::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(&json!(true)));
/// assert!(is_truthy(&json!("write")));
/// assert!(!is_truthy(&json!("")));
/// assert!(!is_truthy(&json!(0)));
/// ```
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a value as it appears in a rendered prompt.
///
/// Strings are emitted raw, `null` as nothing, and everything else as
/// compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
