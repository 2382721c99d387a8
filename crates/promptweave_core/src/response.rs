//! Provider response types.

use serde::{Deserialize, Serialize};

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u64,
    /// Tokens in the completion
    pub completion_tokens: u64,
    /// Sum of both
    pub total_tokens: u64,
}

/// The raw response of one generation call.
///
/// # Examples
///
/// ```
/// use promptweave_core::GenerationResponse;
///
/// let response = GenerationResponse::simulated("Once upon a time.");
/// assert_eq!(response.provider, "simulation");
/// assert_eq!(response.text, "Once upon a time.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Provider that produced the text
    pub provider: String,
    /// Generated text
    pub text: String,
    /// Token accounting
    pub usage: TokenUsage,
    /// Provider status code (HTTP-like)
    pub status: u16,
}

impl GenerationResponse {
    /// Create a successful response for the given provider.
    pub fn new(provider: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            text: text.into(),
            usage: TokenUsage::default(),
            status: 200,
        }
    }

    /// Response attributed to simulation mode.
    pub fn simulated(text: impl Into<String>) -> Self {
        Self::new("simulation", text)
    }
}
