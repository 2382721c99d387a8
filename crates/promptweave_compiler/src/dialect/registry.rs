//! Name to directive lookup.

use crate::PlanOptions;
use crate::dialect::{TagDefinition, builtins};
use std::collections::HashMap;

/// Registry of the directives available to one planning pass.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: HashMap<String, TagDefinition>,
}

impl TagRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the built-in directives.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register(&mut registry);
        registry
    }

    /// Built-ins, then the caller's sync directives, then the caller's async
    /// directives. Later registrations shadow earlier ones.
    #[tracing::instrument(skip(options))]
    pub fn for_options(options: &PlanOptions) -> Self {
        let mut registry = Self::with_builtins();
        for (name, tag) in options.sync_tags() {
            registry.register(name.clone(), TagDefinition::Sync(tag.clone()));
        }
        for (name, tag) in options.tags() {
            registry.register(name.clone(), TagDefinition::Async(tag.clone()));
        }
        tracing::debug!(count = registry.len(), "Directive registry ready");
        registry
    }

    /// Register a directive, replacing any previous one of the same name.
    pub fn register(&mut self, name: impl Into<String>, definition: TagDefinition) {
        let name = name.into();
        if self.tags.contains_key(&name) {
            tracing::debug!(tag = %name, "Directive shadows an earlier registration");
        }
        self.tags.insert(name, definition);
    }

    /// Look up a directive.
    pub fn get(&self, name: &str) -> Option<&TagDefinition> {
        self.tags.get(name)
    }

    /// Whether a directive of this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tags.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered directives.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
