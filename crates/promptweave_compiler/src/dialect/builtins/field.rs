//! `{% field name="{ default: 'x', label: 'Name', options: [...] }" %}`

use crate::dialect::TagCall;
use promptweave_core::{control_flow, is_truthy, value_to_text};
use promptweave_error::{DirectiveError, DirectiveErrorKind, PromptweaveResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared shape of one field, written as a JSON5 object literal.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FieldSpec {
    default: Option<Value>,
    label: Option<String>,
    options: Option<Vec<Value>>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Entry of the `PROMPT_FIELDS` registry.
#[derive(Debug, Serialize)]
struct FieldMeta {
    key: String,
    default: Value,
    options: Vec<String>,
    label: String,
    order: usize,
    #[serde(rename = "type")]
    kind: String,
}

/// Declare input fields.
///
/// Each argument declares one field: its value is written to the outputs
/// (caller input wins over the declared default) and its metadata is
/// recorded under `PROMPT_FIELDS`.
pub(crate) fn field(call: TagCall<'_>) -> PromptweaveResult<Option<String>> {
    for (key, raw) in call.arguments.iter() {
        let spec = parse_spec(key, raw)?;

        let value = call
            .context
            .input_values()
            .get(key)
            .filter(|v| !v.is_null())
            .or(spec.default.as_ref().filter(|v| !v.is_null()))
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
        call.context.set_output(key, value);

        let meta = field_meta(key, spec, call.instance.field_index);
        let meta = serde_json::to_value(meta).map_err(|e| {
            DirectiveError::new(DirectiveErrorKind::InvalidFieldSpec {
                field: key.to_string(),
                message: e.to_string(),
            })
        })?;

        let outputs = call.context.output_values_mut();
        let registry = outputs
            .entry(control_flow::PROMPT_FIELDS)
            .or_insert_with(|| Value::Object(Default::default()));
        if !registry.is_object() {
            *registry = Value::Object(Default::default());
        }
        if let Value::Object(fields) = registry {
            fields.insert(key.to_string(), meta);
        }

        tracing::trace!(field = key, order = call.instance.field_index, "Declared field");
        call.instance.field_index += 1;
    }
    call.instance.field_index = 0;
    Ok(None)
}

fn field_meta(key: &str, spec: FieldSpec, order: usize) -> FieldMeta {
    let kind = spec.kind.clone().unwrap_or_else(|| detect_kind(&spec).to_string());
    let mut default = spec.default.unwrap_or_else(|| Value::String(String::new()));
    let options: Vec<String> = spec
        .options
        .unwrap_or_default()
        .iter()
        .map(value_to_text)
        .collect();

    // Any truthy declared default is replaced by the first option.
    if is_truthy(&default)
        && let Some(first) = options.first()
    {
        default = Value::String(first.clone());
    }

    FieldMeta {
        key: key.to_string(),
        default,
        options,
        label: spec.label.unwrap_or_else(|| key.to_string()),
        order,
        kind,
    }
}

fn detect_kind(spec: &FieldSpec) -> &'static str {
    if spec.options.as_ref().is_some_and(|o| !o.is_empty()) {
        return "select";
    }
    match &spec.default {
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f != 0.0) => "number",
        Some(Value::String(s)) if s.contains('\n') => "textarea",
        _ => "text",
    }
}

fn parse_spec(key: &str, raw: &Value) -> PromptweaveResult<FieldSpec> {
    let invalid = |message: String| {
        DirectiveError::new(DirectiveErrorKind::InvalidFieldSpec {
            field: key.to_string(),
            message,
        })
    };

    let Value::String(text) = raw else {
        return Err(invalid(format!("expected an object literal string, found {raw}")).into());
    };

    json5::from_str(&escape_string_newlines(text)).map_err(|e| invalid(e.to_string()).into())
}

/// Turn raw newlines inside string literals into `\n` escapes so a quoted
/// default may span lines. Newlines in comments and between tokens are kept.
fn escape_string_newlines(text: &str) -> String {
    enum Scan {
        Code,
        Quoted { quote: char, escaped: bool },
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = Scan::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        state = match state {
            Scan::Quoted { quote, escaped: true } => {
                out.push(c);
                Scan::Quoted { quote, escaped: false }
            }
            Scan::Quoted { quote, escaped: false } => match c {
                '\n' => {
                    out.push_str("\\n");
                    Scan::Quoted { quote, escaped: false }
                }
                '\\' => {
                    out.push(c);
                    Scan::Quoted { quote, escaped: true }
                }
                c if c == quote => {
                    out.push(c);
                    Scan::Code
                }
                c => {
                    out.push(c);
                    Scan::Quoted { quote, escaped: false }
                }
            },
            Scan::LineComment => {
                out.push(c);
                if c == '\n' { Scan::Code } else { Scan::LineComment }
            }
            Scan::BlockComment => {
                out.push(c);
                if c == '*' && chars.peek() == Some(&'/') {
                    out.push('/');
                    chars.next();
                    Scan::Code
                } else {
                    Scan::BlockComment
                }
            }
            Scan::Code => {
                out.push(c);
                match (c, chars.peek()) {
                    ('"' | '\'', _) => Scan::Quoted { quote: c, escaped: false },
                    ('/', Some('/')) => Scan::LineComment,
                    ('/', Some('*')) => {
                        out.push('*');
                        chars.next();
                        Scan::BlockComment
                    }
                    _ => Scan::Code,
                }
            }
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn spec_accepts_unquoted_keys_and_single_quotes() {
        let spec = parse_spec("f", &json!("{ default: 'bar', label: 'Foo', options: ['bar', 'baz'] }"))
            .unwrap();
        assert_eq!(spec.default, Some(json!("bar")));
        assert_eq!(spec.label.as_deref(), Some("Foo"));
        assert_eq!(spec.options, Some(vec![json!("bar"), json!("baz")]));
    }

    #[test]
    fn multi_line_defaults_keep_newlines() {
        let spec = parse_spec("f", &json!("{\n  default: 'line one\nline two'\n}")).unwrap();
        assert_eq!(spec.default, Some(json!("line one\nline two")));
        assert_eq!(detect_kind(&spec), "textarea");
    }

    #[test]
    fn kind_detection() {
        let spec = |v: Value| parse_spec("f", &v).unwrap();
        assert_eq!(detect_kind(&spec(json!("{ options: [1, 2] }"))), "select");
        assert_eq!(detect_kind(&spec(json!("{ default: 3 }"))), "number");
        assert_eq!(detect_kind(&spec(json!("{ default: 0 }"))), "text");
        assert_eq!(detect_kind(&spec(json!("{ default: 'x' }"))), "text");
    }

    #[test]
    fn truthy_default_becomes_first_option() {
        let spec = parse_spec("f", &json!("{ default: 'baz', options: ['bar', 'baz'] }")).unwrap();
        let meta = field_meta("f", spec, 0);
        assert_eq!(meta.default, json!("bar"));
        assert_eq!(meta.kind, "select");

        let spec = parse_spec("f", &json!("{ default: '', options: ['bar'] }")).unwrap();
        assert_eq!(field_meta("f", spec, 0).default, json!(""));
    }

    #[test]
    fn escaped_quotes_inside_single_quoted_strings() {
        let spec = parse_spec("tone", &json!(r"{ default: 'it\'s fine' }")).unwrap();
        assert_eq!(spec.default, Some(json!("it's fine")));
    }

    #[test]
    fn comments_and_trailing_commas_are_allowed() {
        let source = "{ // the tone\n  default: 'calm', /* shown in forms */ label: 'Tone',\n}";
        let spec = parse_spec("tone", &json!(source)).unwrap();
        assert_eq!(spec.default, Some(json!("calm")));
        assert_eq!(spec.label.as_deref(), Some("Tone"));
    }

    #[test]
    fn json5_numbers() {
        let spec = parse_spec("n", &json!("{ default: +5 }")).unwrap();
        assert_eq!(spec.default.as_ref().and_then(Value::as_f64), Some(5.0));
        assert_eq!(detect_kind(&spec), "number");
    }

    #[test]
    fn comment_quotes_do_not_open_strings() {
        assert_eq!(
            escape_string_newlines("{ // it's\n a: 'x\ny' }"),
            "{ // it's\n a: 'x\\ny' }"
        );
    }

    #[test]
    fn non_string_spec_is_rejected() {
        assert!(parse_spec("f", &Value::Null).is_err());
        assert!(parse_spec("f", &json!("{ unclosed: 'x'")).is_err());
    }
}
