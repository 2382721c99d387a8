use crate::dialect::{AsyncTag, TagCall};
use async_trait::async_trait;
use promptweave_core::value_to_text;
use promptweave_error::{
    DirectiveError, DirectiveErrorKind, PromptweaveErrorKind, PromptweaveResult,
    RetrievalErrorKind,
};
use serde_json::Value;

const DEFAULT_COUNT: usize = 3;
const NO_CORPUS: &str = "<!-- examples: no corpus configured -->";
const NO_MATCHES: &str = "<!-- examples: no matches for query -->";

/// `{% examples query='{{ topic }}' count=3 source='corpus/' %}`
///
/// Asks the configured example retriever for the texts most similar to
/// `query` and renders them as numbered, fenced blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExamplesTag;

#[async_trait]
impl AsyncTag for ExamplesTag {
    async fn call(&self, call: TagCall<'_>) -> PromptweaveResult<Option<String>> {
        let text = |key: &str| call.arguments.get(key).map(value_to_text).unwrap_or_default();
        let query = text("query");
        let source = text("source");
        let count = call.arguments.get("count").and_then(count_of).unwrap_or(DEFAULT_COUNT);

        let Some(retriever) = call.options.retriever().as_ref() else {
            tracing::debug!("No example retriever configured");
            return Ok(Some(NO_CORPUS.to_string()));
        };
        if source.trim().is_empty() {
            return Ok(Some(NO_CORPUS.to_string()));
        }

        tracing::debug!(query = %query, count, source = %source, "Retrieving examples");
        let examples = match retriever.retrieve(&query, count, &source).await {
            Ok(examples) => examples,
            Err(e) => match e.kind() {
                PromptweaveErrorKind::Retrieval(missing)
                    if matches!(missing.kind, RetrievalErrorKind::CorpusNotFound(_)) =>
                {
                    tracing::debug!(source = %source, "Example corpus does not exist");
                    return Ok(Some(NO_CORPUS.to_string()));
                }
                _ => {
                    return Err(DirectiveError::new(DirectiveErrorKind::Failed {
                        tag: call.name.to_string(),
                        message: e.message(),
                    })
                    .into());
                }
            },
        };

        if examples.is_empty() {
            return Ok(Some(NO_MATCHES.to_string()));
        }
        Ok(Some(format_examples(&examples)))
    }
}

fn count_of(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn format_examples(examples: &[String]) -> String {
    examples
        .iter()
        .enumerate()
        .map(|(i, text)| format!("Example {}:\n```\n{}\n```", i + 1, text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn examples_are_numbered_and_fenced() {
        let out = format_examples(&["first".into(), "second\n".into()]);
        assert_eq!(out, "Example 1:\n```\nfirst\n```\n\nExample 2:\n```\nsecond\n```");
    }

    #[test]
    fn count_accepts_numbers_and_strings() {
        assert_eq!(count_of(&json!(2)), Some(2));
        assert_eq!(count_of(&json!("5")), Some(5));
        assert_eq!(count_of(&json!("many")), None);
        assert_eq!(count_of(&json!(-1)), None);
    }
}
