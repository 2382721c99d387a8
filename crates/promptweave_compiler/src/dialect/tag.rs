//! Directive capability traits.

use crate::dialect::TagCall;
use async_trait::async_trait;
use promptweave_error::PromptweaveResult;
use std::sync::Arc;

/// A directive that computes its result without suspending.
///
/// Any `Fn(TagCall<'_>) -> PromptweaveResult<Option<String>>` is a sync tag.
pub trait SyncTag: Send + Sync {
    /// Run the directive; returned text is spliced into the prompt.
    fn call(&self, call: TagCall<'_>) -> PromptweaveResult<Option<String>>;
}

impl<F> SyncTag for F
where
    F: for<'c> Fn(TagCall<'c>) -> PromptweaveResult<Option<String>> + Send + Sync,
{
    fn call(&self, call: TagCall<'_>) -> PromptweaveResult<Option<String>> {
        self(call)
    }
}

/// A directive that may await long-running work after its arguments are
/// resolved.
#[async_trait]
pub trait AsyncTag: Send + Sync {
    /// Run the directive; returned text is spliced into the prompt.
    async fn call(&self, call: TagCall<'_>) -> PromptweaveResult<Option<String>>;
}

/// A registered directive, classified once at registration time.
#[derive(Clone)]
pub enum TagDefinition {
    /// Drain arguments, then call
    Sync(Arc<dyn SyncTag>),
    /// Drain arguments, then await
    Async(Arc<dyn AsyncTag>),
}

impl TagDefinition {
    /// Wrap a sync directive (closures included).
    pub fn sync<F>(tag: F) -> Self
    where
        F: for<'c> Fn(TagCall<'c>) -> PromptweaveResult<Option<String>> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(tag))
    }

    /// Wrap an async directive.
    pub fn from_async(tag: impl AsyncTag + 'static) -> Self {
        Self::Async(Arc::new(tag))
    }

    /// Whether the directive awaits.
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl std::fmt::Debug for TagDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("TagDefinition::Sync"),
            Self::Async(_) => f.write_str("TagDefinition::Async"),
        }
    }
}
