use crate::dialect::TagCall;
use promptweave_error::PromptweaveResult;
use serde_json::Value;

/// Average characters per word.
const CHARS_PER_WORD: f64 = 5.0;

/// `{% chars_to_words chars=N %}`: estimated word count for `N` characters.
pub(crate) fn chars_to_words(call: TagCall<'_>) -> PromptweaveResult<Option<String>> {
    let chars = call.arguments.get("chars").map_or(0.0, char_count);
    Ok(Some(estimate_words(chars)))
}

fn char_count(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => leading_integer(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Integer prefix of a string, ignoring leading whitespace (`"120 chars"` is 120).
fn leading_integer(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let digits_end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(text.len(), |(i, _)| i);
    text[..digits_end].parse::<i64>().ok().map(|n| n as f64)
}

fn estimate_words(chars: f64) -> String {
    if chars > CHARS_PER_WORD {
        format!("{}", (chars / CHARS_PER_WORD).round() as i64)
    } else {
        "1".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn small_counts_are_one_word() {
        assert_eq!(estimate_words(0.0), "1");
        assert_eq!(estimate_words(5.0), "1");
    }

    #[test]
    fn larger_counts_round_to_nearest() {
        assert_eq!(estimate_words(6.0), "1");
        assert_eq!(estimate_words(50.0), "10");
        assert_eq!(estimate_words(12.5), "3");
        assert_eq!(estimate_words(13.0), "3");
    }

    #[test]
    fn numeric_strings_are_accepted() {
        assert_eq!(char_count(&json!("250")), 250.0);
        assert_eq!(char_count(&json!(" 42 chars")), 42.0);
        assert_eq!(char_count(&json!("many")), 0.0);
        assert_eq!(char_count(&json!(true)), 0.0);
    }
}
