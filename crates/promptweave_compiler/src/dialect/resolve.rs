//! Directive argument resolution.

use crate::template::{Scope, TagArguments, VariablePath};
use promptweave_core::VariableMap;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static VARIABLE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\{\s*(.+?)\s*\}\}$").expect("Valid variable reference regex")
});

struct Layered<'a> {
    output: &'a VariableMap,
    input: &'a VariableMap,
}

impl Scope for Layered<'_> {
    fn find(&self, path: &VariablePath) -> Option<Value> {
        self.output
            .get(path.root())
            .or_else(|| self.input.get(path.root()))
            .and_then(|root| path.walk(root))
            .cloned()
    }
}

/// Resolve `{{ name }}` string arguments against step variables.
///
/// A string that is exactly one `{{ name }}` reference resolves from
/// `output` first, then `input`; an undefined (or `null`) variable resolves
/// to the empty string. Other strings are literals. Non-string values pass
/// through unchanged.
///
/// # Examples
///
/// ```
/// use promptweave_compiler::{TagArguments, resolve_arguments};
/// use promptweave_core::VariableMap;
/// use serde_json::json;
///
/// let mut args = TagArguments::new();
/// args.insert("x", json!("{{ x }}"));
///
/// let mut output = VariableMap::new();
/// output.insert("x".into(), json!("1"));
/// let mut input = VariableMap::new();
/// input.insert("x".into(), json!("2"));
///
/// let resolved = resolve_arguments(&args, &output, &input);
/// assert_eq!(resolved.get("x"), Some(&json!("1")));
/// ```
pub fn resolve_arguments(
    arguments: &TagArguments,
    output: &VariableMap,
    input: &VariableMap,
) -> TagArguments {
    let scope = Layered { output, input };
    arguments
        .iter()
        .map(|(key, value)| {
            let resolved = match value {
                Value::String(text) => match VARIABLE_REFERENCE.captures(text) {
                    Some(captures) => VariablePath::parse(&captures[1])
                        .and_then(|path| scope.find(&path))
                        .filter(|v| !v.is_null())
                        .unwrap_or_else(|| Value::String(String::new())),
                    None => value.clone(),
                },
                other => other.clone(),
            };
            (key.to_string(), resolved)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> VariableMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn resolve_one(value: Value, output: Value, input: Value) -> Value {
        let mut args = TagArguments::new();
        args.insert("v", value);
        let resolved = resolve_arguments(&args, &map(output), &map(input));
        resolved.get("v").cloned().unwrap_or(Value::Null)
    }

    #[test]
    fn output_takes_precedence_over_input() {
        assert_eq!(
            resolve_one(json!("{{ x }}"), json!({"x": "1"}), json!({"x": "2"})),
            json!("1")
        );
    }

    #[test]
    fn input_is_used_when_output_lacks_the_variable() {
        assert_eq!(
            resolve_one(json!("{{ x }}"), json!({}), json!({"x": "2"})),
            json!("2")
        );
    }

    #[test]
    fn undefined_variable_resolves_to_empty_string() {
        assert_eq!(resolve_one(json!("{{x}}"), json!({}), json!({})), json!(""));
    }

    #[test]
    fn literals_and_non_strings_pass_through() {
        assert_eq!(
            resolve_one(json!("plain {{ x }} text"), json!({}), json!({"x": 1})),
            json!("plain {{ x }} text")
        );
        assert_eq!(resolve_one(json!(42), json!({}), json!({})), json!(42));
        assert_eq!(resolve_one(Value::Null, json!({}), json!({})), Value::Null);
    }

    #[test]
    fn nested_paths_resolve() {
        assert_eq!(
            resolve_one(json!("{{ user.name }}"), json!({}), json!({"user": {"name": "Ada"}})),
            json!("Ada")
        );
    }
}
