//! Collaborator traits.

use crate::{GenerationOptions, StreamChunk, TokenStream};
use async_trait::async_trait;
use promptweave_core::{GenerationResponse, WorkflowEvent};
use promptweave_error::PromptweaveResult;

/// A text-generation backend addressed by a model-identifier prefix.
///
/// Implementations receive the model name with the provider prefix
/// already stripped (`openai/gpt-4o` reaches the `openai` provider as
/// `gpt-4o`).
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name, matching the model prefix it serves (e.g. "openai").
    fn provider_name(&self) -> &str;

    /// Generate the full text for a prompt.
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> PromptweaveResult<GenerationResponse>;

    /// Generate text incrementally.
    ///
    /// The default implementation waits for [`generate`](Self::generate)
    /// and yields its text as a single final chunk.
    async fn generate_stream(
        &self,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> PromptweaveResult<TokenStream> {
        let response = self.generate(prompt, model, options).await?;
        let chunk = StreamChunk::last(response.text);
        Ok(Box::pin(futures_util::stream::iter(vec![Ok(chunk)])))
    }
}

/// Source of example texts for the `examples` directive.
#[async_trait]
pub trait ExampleRetriever: Send + Sync {
    /// Up to `count` examples most similar to `query` from the corpus rooted
    /// at `source`, most similar first.
    async fn retrieve(
        &self,
        query: &str,
        count: usize,
        source: &str,
    ) -> PromptweaveResult<Vec<String>>;
}

/// Receives workflow lifecycle events synchronously, in program order.
///
/// Any `FnMut(WorkflowEvent)` closure is an observer.
pub trait WorkflowObserver: Send {
    /// Handle one event.
    fn on_event(&mut self, event: WorkflowEvent);
}

impl<F> WorkflowObserver for F
where
    F: FnMut(WorkflowEvent) + Send,
{
    fn on_event(&mut self, event: WorkflowEvent) {
        self(event)
    }
}
