//! Directive argument grammar.
//!
//! ```text
//! arguments := item ((',' | whitespace) item)* ','?
//! item      := key (('=' | ':') value)?
//! value     := quoted | number | path | true | false | nil | null
//! path      := key ('.' (key | digits) | '[' (digits | quoted) ']')*
//! ```
//!
//! Quoted strings take everything up to the matching quote, newlines
//! included; there are no escape sequences.
//!
//! [`markup`] locates one `{% name arguments %}` tag in template source so
//! directive arguments can be parsed before the host engine sees them.

use crate::template::{ArgumentExpr, ArgumentValue, PathSegment, VariablePath};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{anychar, char, digit1, multispace0, multispace1, satisfy},
    combinator::{all_consuming, map, map_res, not, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
};
use serde_json::{Number, Value};

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn key(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(is_key_char),
    ))(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
    ))(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    map_res(
        terminated(
            recognize(tuple((
                opt(alt((char('-'), char('+')))),
                digit1,
                opt(pair(char('.'), digit1)),
            ))),
            not(satisfy(is_key_char)),
        ),
        |text: &str| {
            let text = text.trim_start_matches('+');
            match text.parse::<i64>() {
                Ok(n) => Ok(Value::from(n)),
                Err(_) => text
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or("not a finite number"),
            }
        },
    )(input)
}

fn index(input: &str) -> IResult<&str, PathSegment> {
    map_res(digit1, |digits: &str| digits.parse().map(PathSegment::Index))(input)
}

fn segment(input: &str) -> IResult<&str, PathSegment> {
    alt((
        preceded(
            char('.'),
            alt((index, map(key, |k| PathSegment::Key(k.to_string())))),
        ),
        delimited(
            char('['),
            alt((index, map(quoted, |k| PathSegment::Key(k.to_string())))),
            char(']'),
        ),
    ))(input)
}

fn path(input: &str) -> IResult<&str, VariablePath> {
    map(pair(key, many0(segment)), |(root, segments)| {
        VariablePath::new(root, segments)
    })(input)
}

fn keyword_or_path(path: VariablePath) -> ArgumentValue {
    if !path.segments().is_empty() {
        return ArgumentValue::Path(path);
    }
    match path.root() {
        "true" => ArgumentValue::Literal(Value::Bool(true)),
        "false" => ArgumentValue::Literal(Value::Bool(false)),
        "nil" | "null" => ArgumentValue::Literal(Value::Null),
        _ => ArgumentValue::Path(path),
    }
}

fn argument_value(input: &str) -> IResult<&str, ArgumentValue> {
    alt((
        map(quoted, |text| {
            ArgumentValue::Literal(Value::String(text.to_string()))
        }),
        map(number, ArgumentValue::Literal),
        map(path, keyword_or_path),
    ))(input)
}

fn item(input: &str) -> IResult<&str, ArgumentExpr> {
    let (input, name) = key(input)?;
    let (input, assigned) = opt(preceded(
        tuple((multispace0, alt((char('='), char(':'))), multispace0)),
        argument_value,
    ))(input)?;
    Ok((
        input,
        ArgumentExpr::new(name, assigned.unwrap_or(ArgumentValue::Absent)),
    ))
}

fn separator(input: &str) -> IResult<&str, ()> {
    alt((
        value((), tuple((multispace0, char(','), multispace0))),
        value((), multispace1),
    ))(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<ArgumentExpr>> {
    delimited(
        multispace0,
        terminated(
            separated_list0(separator, item),
            opt(pair(multispace0, char(','))),
        ),
        multispace0,
    )(input)
}

/// Parse the argument text of one directive occurrence.
///
/// # Errors
///
/// Returns a short description of where the text stops following the
/// grammar.
///
/// ```
/// use promptweave_compiler::template::{ArgumentValue, parse_arguments};
/// use serde_json::json;
///
/// let items = parse_arguments("topic='space', count: 3 draft").unwrap();
/// assert_eq!(items[0].key(), "topic");
/// assert_eq!(items[1].value(), &ArgumentValue::Literal(json!(3)));
/// assert_eq!(items[2].value(), &ArgumentValue::Absent);
/// ```
pub fn parse_arguments(text: &str) -> Result<Vec<ArgumentExpr>, String> {
    match all_consuming(arguments)(text) {
        Ok((_, items)) => Ok(items),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(unexpected(e.input)),
        Err(nom::Err::Incomplete(_)) => Err("incomplete arguments".to_string()),
    }
}

pub(crate) fn variable_path(text: &str) -> Option<VariablePath> {
    all_consuming(path)(text).ok().map(|(_, path)| path)
}

/// The pieces of one `{% name arguments %}` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Markup<'s> {
    /// `{%` or `{%-`
    pub(crate) open: &'s str,
    pub(crate) name: &'s str,
    /// Raw argument text, surrounding whitespace included
    pub(crate) arguments: &'s str,
    /// `%}` or `-%}`
    pub(crate) close: &'s str,
}

fn close_delimiter(input: &str) -> IResult<&str, &str> {
    alt((tag("-%}"), tag("%}")))(input)
}

fn tag_markup(input: &str) -> IResult<&str, Markup<'_>> {
    map(
        tuple((
            alt((tag("{%-"), tag("{%"))),
            preceded(multispace0, key),
            recognize(many0(alt((
                recognize(quoted),
                recognize(preceded(not(close_delimiter), anychar)),
            )))),
            close_delimiter,
        )),
        |(open, name, arguments, close)| Markup {
            open,
            name,
            arguments,
            close,
        },
    )(input)
}

/// Parse the tag starting at the beginning of `input`, returning it with the
/// text that follows it. A `%}` inside a quoted argument does not close the
/// tag.
pub(crate) fn markup(input: &str) -> Option<(&str, Markup<'_>)> {
    tag_markup(input).ok()
}

fn unexpected(rest: &str) -> String {
    let snippet: String = rest.chars().take(24).collect();
    if snippet.is_empty() {
        "unexpected end of arguments".to_string()
    } else {
        format!("unexpected input at `{snippet}`")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn literal(value: Value) -> ArgumentValue {
        ArgumentValue::Literal(value)
    }

    #[test]
    fn both_assignment_styles_and_separators() {
        let items = parse_arguments(r#"a="x", b: 'y' c=1"#).unwrap();
        let pairs: Vec<_> = items.iter().map(|i| (i.key(), i.value().clone())).collect();
        assert_eq!(
            pairs,
            [
                ("a", literal(json!("x"))),
                ("b", literal(json!("y"))),
                ("c", literal(json!(1))),
            ]
        );
    }

    #[test]
    fn bare_keys_may_contain_hyphens() {
        let items = parse_arguments("write-fiction").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key(), "write-fiction");
        assert_eq!(items[0].value(), &ArgumentValue::Absent);
    }

    #[test]
    fn quoted_values_keep_inner_quotes_and_newlines() {
        let items = parse_arguments("spec=\"{ default: 'it\\'s',\n label: 'L' }\"").unwrap();
        assert_eq!(
            items[0].value(),
            &literal(json!("{ default: 'it\\'s',\n label: 'L' }"))
        );
    }

    #[test]
    fn numbers_and_keywords() {
        let items = parse_arguments("a=-2 b=2.5 c=+7 d=true e=nil f=false").unwrap();
        let values: Vec<_> = items.iter().map(|i| i.value().clone()).collect();
        assert_eq!(
            values,
            [
                literal(json!(-2)),
                literal(json!(2.5)),
                literal(json!(7)),
                literal(json!(true)),
                literal(Value::Null),
                literal(json!(false)),
            ]
        );
    }

    #[test]
    fn unquoted_values_are_paths() {
        let items = parse_arguments("q=user.tags[1] r=topic").unwrap();
        match items[0].value() {
            ArgumentValue::Path(path) => assert_eq!(path.to_string(), "user.tags[1]"),
            other => panic!("expected a path, got {other:?}"),
        }
        assert!(matches!(items[1].value(), ArgumentValue::Path(p) if p.root() == "topic"));
    }

    #[test]
    fn empty_and_trailing_comma() {
        assert!(parse_arguments("").unwrap().is_empty());
        assert!(parse_arguments("   ").unwrap().is_empty());
        assert_eq!(parse_arguments("a=1, b=2,").unwrap().len(), 2);
    }

    #[test]
    fn markup_splits_a_tag() {
        let (rest, found) = markup("{%- field name='a %} b' -%} after").unwrap();
        assert_eq!(rest, " after");
        assert_eq!(found.open, "{%-");
        assert_eq!(found.name, "field");
        assert_eq!(found.arguments, " name='a %} b' ");
        assert_eq!(found.close, "-%}");
        assert!(markup("{% unterminated").is_none());
        assert!(markup("{{ output }}").is_none());
    }

    #[test]
    fn malformed_arguments_report_position() {
        let err = parse_arguments("a=1 =oops").unwrap_err();
        assert!(err.contains("=oops"), "{err}");
        assert!(parse_arguments("a='unterminated").is_err());
        assert!(parse_arguments("a=12abc").is_err());
    }
}
