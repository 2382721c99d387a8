//! Per-render directive context.

use crate::PlanOptions;
use crate::template::{Scope, TagArguments, VariablePath};
use promptweave_core::VariableMap;
use serde_json::Value;

/// Variables visible to the directives of one step render.
///
/// The input view is read-only; directives write only to the output
/// accumulator, which becomes the step's output values once rendering
/// finishes.
#[derive(Debug, Clone, Default, PartialEq, derive_getters::Getters)]
pub struct TagContext {
    /// Label of the step being rendered
    step_name: String,
    /// Caller input
    input_values: VariableMap,
    /// Values written by directives so far
    output_values: VariableMap,
}

impl TagContext {
    /// Fresh context with empty outputs.
    pub fn new(step_name: impl Into<String>, input_values: VariableMap) -> Self {
        Self {
            step_name: step_name.into(),
            input_values,
            output_values: VariableMap::new(),
        }
    }

    /// Write one output variable.
    pub fn set_output(&mut self, key: impl Into<String>, value: Value) {
        self.output_values.insert(key.into(), value);
    }

    /// Mutable access to the output accumulator.
    pub fn output_values_mut(&mut self) -> &mut VariableMap {
        &mut self.output_values
    }

    /// Consume the context, keeping the outputs.
    pub fn into_output(self) -> VariableMap {
        self.output_values
    }

    /// Resolve a variable name or dotted path, outputs before inputs.
    pub fn resolve(&self, label: &str) -> Option<Value> {
        VariablePath::parse(label).and_then(|path| self.find(&path))
    }
}

impl Scope for TagContext {
    fn find(&self, path: &VariablePath) -> Option<Value> {
        self.output_values
            .get(path.root())
            .or_else(|| self.input_values.get(path.root()))
            .and_then(|root| path.walk(root))
            .cloned()
    }
}

/// State that belongs to one tag occurrence in a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagInstance {
    /// Position of the next declared field within the current invocation
    pub field_index: usize,
}

/// Everything a directive receives when it is invoked.
pub struct TagCall<'c> {
    /// Name the directive was invoked under
    pub name: &'c str,
    /// Step render context
    pub context: &'c mut TagContext,
    /// Resolved arguments
    pub arguments: &'c TagArguments,
    /// Planning options (caller tags, retriever)
    pub options: &'c PlanOptions,
    /// Per-occurrence state
    pub instance: &'c mut TagInstance,
}
