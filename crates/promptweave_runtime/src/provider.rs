//! Generation provider lookup by model-identifier prefix.

use promptweave_error::{ProviderError, ProviderErrorKind, PromptweaveResult};
use promptweave_interface::GenerationProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of generation providers keyed by their model prefix.
///
/// A model identifier such as `anthropic/claude-3-5-sonnet-latest` is split
/// at the first `/`; the prefix selects the provider and the remainder is
/// passed to it as the model name.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn GenerationProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its [`provider_name`](GenerationProvider::provider_name).
    ///
    /// A provider registered under an existing name replaces the old one.
    pub fn register(&mut self, provider: Arc<dyn GenerationProvider>) {
        let name = provider.provider_name().to_string();
        debug!(provider = %name, "Registering generation provider");
        self.providers.insert(name, provider);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Look up a provider by prefix.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn GenerationProvider>> {
        self.providers.get(name)
    }

    /// Registered prefixes, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolve a model identifier to its provider and the bare model name.
    ///
    /// # Errors
    ///
    /// [`ProviderErrorKind::UnsupportedModel`] when the identifier has no
    /// prefix or the prefix is not registered.
    pub fn resolve(
        &self,
        model_id: &str,
    ) -> PromptweaveResult<(Arc<dyn GenerationProvider>, String)> {
        let unsupported =
            || ProviderError::new(ProviderErrorKind::UnsupportedModel(model_id.to_string()));

        let Some((prefix, model)) = model_id.split_once('/') else {
            return Err(unsupported().into());
        };
        match self.providers.get(prefix) {
            Some(provider) => Ok((Arc::clone(provider), model.to_string())),
            None => Err(unsupported().into()),
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
