//! Glue between directive occurrences and the `liquid` engine.

use crate::template::grammar::{self, Markup};
use crate::template::{ArgumentExpr, PathSegment, Scope, VariablePath, parse_arguments};
use liquid_core::Runtime;
use liquid_core::model::{KString, ScalarCow, ValueView};
use promptweave_core::VariableMap;
use promptweave_error::{PromptweaveResult, TemplateError, TemplateErrorKind};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static RAW_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%-?\s*endraw\s*-?%\}").expect("Valid endraw regex"));

static COMMENT_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%-?\s*endcomment\s*-?%\}").expect("Valid endcomment regex"));

static OUTPUT_ROOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{-?\s*([A-Za-z_][\w-]*)").expect("Valid output root regex")
});

static CONDITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%-?\s*(?:if|elsif|unless|case|when)\s([^%]*)%\}").expect("Valid condition regex")
});

static LOOP_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%-?\s*for\s+[A-Za-z_][\w-]*\s+in\s+([A-Za-z_][\w-]*)")
        .expect("Valid loop source regex")
});

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|'[^']*'"#).expect("Valid quoted string regex"));

static CONDITION_ROOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w.\-])([A-Za-z_][\w-]*)").expect("Valid condition root regex")
});

const OPERATOR_WORDS: &[&str] = &[
    "and", "or", "contains", "true", "false", "nil", "null", "empty", "blank",
];

/// A directive occurrence cut out of a step body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Occurrence {
    pub(crate) name: String,
    pub(crate) arguments: Vec<ArgumentExpr>,
}

/// Parse the arguments of every directive in `source` and replace each
/// occurrence with `{% name <index> %}`, where `index` points into the
/// returned list. Whitespace control is kept. `raw` and `comment` blocks are
/// copied untouched.
///
/// # Errors
///
/// [`TemplateErrorKind::Arguments`] for the first directive whose argument
/// text does not parse.
pub(crate) fn extract_directives(
    source: &str,
    is_directive: impl Fn(&str) -> bool,
) -> PromptweaveResult<(String, Vec<Occurrence>)> {
    let mut rewritten = String::with_capacity(source.len());
    let mut occurrences = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find("{%") {
        rewritten.push_str(&rest[..start]);
        let here = &rest[start..];
        match grammar::markup(here) {
            Some((after, markup)) if matches!(markup.name, "raw" | "comment") => {
                let end = verbatim_end(markup.name, after);
                rewritten.push_str(&here[..here.len() - after.len() + end]);
                rest = &after[end..];
            }
            Some((after, markup)) if is_directive(markup.name) => {
                let arguments = parse_arguments(markup.arguments).map_err(|message| {
                    TemplateError::new(TemplateErrorKind::Arguments {
                        tag: markup.name.to_string(),
                        message,
                    })
                })?;
                placeholder(&mut rewritten, &markup, occurrences.len());
                occurrences.push(Occurrence {
                    name: markup.name.to_string(),
                    arguments,
                });
                rest = after;
            }
            _ => {
                rewritten.push_str("{%");
                rest = &here[2..];
            }
        }
    }
    rewritten.push_str(rest);

    Ok((rewritten, occurrences))
}

fn placeholder(out: &mut String, markup: &Markup<'_>, index: usize) {
    out.push_str(markup.open);
    out.push(' ');
    out.push_str(markup.name);
    out.push(' ');
    out.push_str(&index.to_string());
    out.push(' ');
    out.push_str(markup.close);
}

fn verbatim_end(block: &str, after: &str) -> usize {
    let end = if block == "raw" { &RAW_END } else { &COMMENT_END };
    end.find(after).map_or(after.len(), |m| m.end())
}

/// Top-level variables the body reads, as far as a textual scan can tell.
fn referenced_roots(source: &str) -> BTreeSet<String> {
    let mut roots: BTreeSet<String> = OUTPUT_ROOT
        .captures_iter(source)
        .chain(LOOP_SOURCE.captures_iter(source))
        .map(|c| c[1].to_string())
        .collect();

    for condition in CONDITION.captures_iter(source) {
        let unquoted = QUOTED.replace_all(&condition[1], " ");
        roots.extend(
            CONDITION_ROOT
                .captures_iter(&unquoted)
                .map(|c| c[1].to_string())
                .filter(|word| !OPERATOR_WORDS.contains(&word.as_str())),
        );
    }
    roots
}

/// Render globals for one step: the input values, plus `nil` for every
/// referenced top-level variable the input does not define so that it
/// renders empty.
pub(crate) fn globals(input: &VariableMap, source: &str) -> PromptweaveResult<liquid::Object> {
    let mut globals = liquid::to_object(input)
        .map_err(|e| TemplateError::new(TemplateErrorKind::Render(e.to_string())))?;
    for root in referenced_roots(source) {
        if !globals.contains_key(root.as_str()) {
            globals.insert(KString::from_string(root), liquid::model::Value::Nil);
        }
    }
    Ok(globals)
}

/// JSON value as a liquid value.
pub(crate) fn to_liquid(value: &Value) -> liquid_core::Result<liquid_core::model::Value> {
    liquid_core::model::to_value(value)
}

/// Variable lookup through the live liquid runtime, so loop variables and
/// `assign`ed names are visible to directive arguments.
pub(crate) struct RuntimeScope<'r>(pub(crate) &'r dyn Runtime);

impl Scope for RuntimeScope<'_> {
    fn find(&self, path: &VariablePath) -> Option<Value> {
        let mut keys = vec![ScalarCow::new(path.root())];
        for segment in path.segments() {
            keys.push(match segment {
                PathSegment::Key(key) => ScalarCow::new(key.as_str()),
                PathSegment::Index(index) => ScalarCow::new(i64::try_from(*index).ok()?),
            });
        }
        let found = self.0.try_get(&keys)?;
        serde_json::to_value(found.to_value()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directives(name: &str) -> bool {
        matches!(name, "field" | "done")
    }

    #[test]
    fn directives_become_numbered_placeholders() {
        let (source, found) =
            extract_directives("A {%- field x='1' %} B {% if y %}{% done -%}{% endif %}", directives)
                .unwrap();
        assert_eq!(source, "A {%- field 0 %} B {% if y %}{% done 1 -%}{% endif %}");
        assert_eq!(found[0].name, "field");
        assert_eq!(found[0].arguments.len(), 1);
        assert!(found[1].arguments.is_empty());
    }

    #[test]
    fn raw_and_comment_blocks_are_left_alone() {
        let body = "{% raw %}{% field a=1 %}{% endraw %}{% comment %}{% done %}{% endcomment %}";
        let (source, found) = extract_directives(body, directives).unwrap();
        assert_eq!(source, body);
        assert!(found.is_empty());
    }

    #[test]
    fn bad_arguments_name_the_directive() {
        let err = extract_directives("{% field a=1 =b %}", directives).unwrap_err();
        assert!(err.message().starts_with("Invalid arguments for tag 'field'"));
    }

    #[test]
    fn undefined_roots_are_seeded_as_nil() {
        let input = json!({"known": 1}).as_object().cloned().unwrap();
        let body = "{{ known }} {{ missing | upcase }} \
                    {% if a and b.c == 'x y' or d contains \"e\" %}{% endif %} \
                    {% for item in list %}{% endfor %}";
        let globals = globals(&input, body).unwrap();

        for root in ["missing", "a", "b", "d", "list"] {
            assert!(globals.contains_key(root), "{root} not seeded");
        }
        for word in ["and", "or", "contains", "c", "x", "e", "item"] {
            assert!(!globals.contains_key(word), "{word} seeded");
        }
        assert_eq!(globals.len(), 6);
    }
}
