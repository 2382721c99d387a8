//! Splits template source into marker and body segments.

use promptweave_core::{Instruction, TemplateSegment};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^---\s*(\w+)\s*(.+?)\s*---$").expect("Valid marker regex")
});

/// Recognize a `--- INSTRUCTION label ---` line.
///
/// Lines whose instruction word is not PROMPT or AFTER are ordinary text.
fn parse_marker(line: &str) -> Option<(Instruction, String)> {
    let captures = MARKER.captures(line.trim())?;
    let instruction = Instruction::from_str(&captures[1]).ok()?;
    Some((instruction, captures[2].trim().to_string()))
}

/// Segment template source.
///
/// Text between markers becomes a body attributed to the marker that was
/// active when the text started. A marker followed directly by another
/// marker (or the end of input) gets no body. Source without any segment
/// at all yields a single body holding the whole source.
///
/// # Examples
///
/// ```
/// use promptweave_compiler::segment;
/// use promptweave_core::{Instruction, TemplateSegment};
///
/// let segments = segment("--- PROMPT write ---\nWrite a story.");
/// assert_eq!(segments.len(), 2);
/// assert_eq!(
///     segments[1],
///     TemplateSegment::Body {
///         instruction: Some(Instruction::Prompt),
///         label: "write".into(),
///         text: "Write a story.".into(),
///     }
/// );
/// ```
pub fn segment(source: &str) -> Vec<TemplateSegment> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let mut active: Option<(Instruction, String)> = None;

    let flush = |buffer: &mut String, active: &Option<(Instruction, String)>| {
        let text = buffer.trim_end().to_string();
        buffer.clear();
        TemplateSegment::Body {
            instruction: active.as_ref().map(|(i, _)| *i),
            label: active.as_ref().map(|(_, l)| l.clone()).unwrap_or_default(),
            text,
        }
    };

    for line in source.split('\n') {
        match parse_marker(line) {
            Some((instruction, label)) => {
                if !buffer.is_empty() {
                    segments.push(flush(&mut buffer, &active));
                }
                segments.push(TemplateSegment::Marker {
                    instruction,
                    label: label.clone(),
                });
                active = Some((instruction, label));
            }
            None => {
                buffer.push_str(line);
                buffer.push('\n');
            }
        }
    }

    if !buffer.trim_end().is_empty() {
        segments.push(flush(&mut buffer, &active));
    }

    if segments.is_empty() {
        segments.push(TemplateSegment::Body {
            instruction: None,
            label: String::new(),
            text: source.to_string(),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(instruction: Option<Instruction>, label: &str, text: &str) -> TemplateSegment {
        TemplateSegment::Body {
            instruction,
            label: label.into(),
            text: text.into(),
        }
    }

    #[test]
    fn source_without_markers_is_one_body() {
        assert_eq!(segment("Hello\nworld\n\n"), vec![body(None, "", "Hello\nworld")]);
    }

    #[test]
    fn empty_source_is_one_empty_body() {
        assert_eq!(segment(""), vec![body(None, "", "")]);
    }

    #[test]
    fn markers_are_case_insensitive() {
        let segments = segment("--- prompt a ---\nx\n--- After a ---\ny");
        assert_eq!(
            segments,
            vec![
                TemplateSegment::Marker {
                    instruction: Instruction::Prompt,
                    label: "a".into()
                },
                body(Some(Instruction::Prompt), "a", "x"),
                TemplateSegment::Marker {
                    instruction: Instruction::After,
                    label: "a".into()
                },
                body(Some(Instruction::After), "a", "y"),
            ]
        );
    }

    #[test]
    fn marker_without_text_gets_no_body() {
        let segments = segment("--- PROMPT a ---\n--- PROMPT b ---\ntext");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2], body(Some(Instruction::Prompt), "b", "text"));
    }

    #[test]
    fn leading_text_precedes_first_marker() {
        let segments = segment("intro\n--- PROMPT a ---\nbody");
        assert_eq!(segments[0], body(None, "", "intro"));
    }

    #[test]
    fn leading_blank_lines_are_kept() {
        let segments = segment("--- PROMPT a ---\n\nTemplate content");
        assert_eq!(segments[1], body(Some(Instruction::Prompt), "a", "\nTemplate content"));
    }

    #[test]
    fn other_dashed_lines_are_text() {
        let segments = segment("--- NOTE a ---\n-----\nbody");
        assert_eq!(segments, vec![body(None, "", "--- NOTE a ---\n-----\nbody")]);
    }

    #[test]
    fn labels_may_contain_spaces() {
        let segments = segment("---   PROMPT   Write Fiction   ---\nbody");
        assert_eq!(
            segments[0],
            TemplateSegment::Marker {
                instruction: Instruction::Prompt,
                label: "Write Fiction".into()
            }
        );
    }
}
