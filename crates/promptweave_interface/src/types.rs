//! Types exchanged with generation providers.

use promptweave_error::PromptweaveResult;
use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Sampling options for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature
    pub temperature: f64,
}

impl GenerationOptions {
    /// Options with the given temperature.
    pub fn new(temperature: f64) -> Self {
        Self { temperature }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self { temperature: 0.7 }
    }
}

/// A chunk of streamed generation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental text
    pub content: String,
    /// Whether this is the final chunk.
    pub is_final: bool,
    /// Optional finish reason if final.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    /// An intermediate chunk.
    pub fn partial(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_final: false,
            finish_reason: None,
        }
    }

    /// The last chunk of a stream.
    pub fn last(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_final: true,
            finish_reason: Some(FinishReason::Stop),
        }
    }
}

/// Why generation stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum FinishReason {
    /// Model completed naturally.
    Stop,
    /// Hit a length limit.
    Length,
    /// Other/unknown reason.
    Other,
}

/// Stream of generation chunks returned by [`GenerationProvider::generate_stream`].
///
/// [`GenerationProvider::generate_stream`]: crate::GenerationProvider::generate_stream
pub type TokenStream = Pin<Box<dyn Stream<Item = PromptweaveResult<StreamChunk>> + Send>>;
