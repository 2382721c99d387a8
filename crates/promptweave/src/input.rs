//! `key=value` input assignments.

use promptweave_core::VariableMap;
use promptweave_error::{ConfigError, PromptweaveResult};
use serde_json::Value;

/// Parse one `key=value` assignment.
///
/// The value is read as JSON when it parses (`n=3`, `draft=true`,
/// `tags=["a","b"]`) and kept as a plain string otherwise.
///
/// # Examples
///
/// ```
/// use promptweave::parse_input;
/// use serde_json::json;
///
/// assert_eq!(parse_input("topic=robots").unwrap(), ("topic".to_string(), json!("robots")));
/// assert_eq!(parse_input("n=3").unwrap().1, json!(3));
/// assert!(parse_input("topic").is_err());
/// ```
pub fn parse_input(raw: &str) -> PromptweaveResult<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(ConfigError::new(format!("Expected key=value, got '{}'", raw)).into());
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::new(format!("Missing input name in '{}'", raw)).into());
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Collect assignments into a variable map; later keys win.
pub fn input_map(pairs: impl IntoIterator<Item = (String, Value)>) -> VariableMap {
    pairs.into_iter().collect()
}
