//! Planning options.

use crate::dialect::{AsyncTag, SyncTag, TagCall};
use promptweave_error::PromptweaveResult;
use promptweave_interface::ExampleRetriever;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Caller-supplied directives and collaborators for one planning pass.
///
/// # Examples
///
/// ```
/// use promptweave_compiler::PlanOptions;
/// use serde_json::json;
///
/// let options = PlanOptions::builder()
///     .sync_tag("mock", |call| {
///         call.context.set_output("CONTROL_FLOW_RESULT", json!("Once upon a time."));
///         Ok(None)
///     })
///     .build()
///     .unwrap();
///
/// assert!(options.sync_tags().contains_key("mock"));
/// ```
#[derive(Clone, Default, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), default)]
pub struct PlanOptions {
    /// Caller directives that may await
    tags: BTreeMap<String, Arc<dyn AsyncTag>>,
    /// Caller directives that complete synchronously
    sync_tags: BTreeMap<String, Arc<dyn SyncTag>>,
    /// Example source for the `examples` directive
    #[builder(setter(custom))]
    retriever: Option<Arc<dyn ExampleRetriever>>,
}

impl PlanOptions {
    /// Creates a new builder.
    pub fn builder() -> PlanOptionsBuilder {
        PlanOptionsBuilder::default()
    }
}

impl PlanOptionsBuilder {
    /// Add one synchronous directive.
    pub fn sync_tag<F>(&mut self, name: impl Into<String>, tag: F) -> &mut Self
    where
        F: for<'c> Fn(TagCall<'c>) -> PromptweaveResult<Option<String>> + Send + Sync + 'static,
    {
        self.sync_tags
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), Arc::new(tag));
        self
    }

    /// Add one asynchronous directive.
    pub fn async_tag(&mut self, name: impl Into<String>, tag: impl AsyncTag + 'static) -> &mut Self {
        self.tags
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), Arc::new(tag));
        self
    }

    /// Set the example retriever.
    pub fn retriever(&mut self, retriever: Arc<dyn ExampleRetriever>) -> &mut Self {
        self.retriever = Some(Some(retriever));
        self
    }
}

impl std::fmt::Debug for PlanOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanOptions")
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .field("sync_tags", &self.sync_tags.keys().collect::<Vec<_>>())
            .field("retriever", &self.retriever.is_some())
            .finish()
    }
}
