//! Directive arguments: parsed expressions, lazy evaluation, results.

use crate::template::{Scope, VariablePath};
use serde_json::Value;

/// Right-hand side of one directive argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// Quoted string, number, boolean or nil
    Literal(Value),
    /// Unquoted variable path, looked up when the directive renders
    Path(VariablePath),
    /// Bare key with no value
    Absent,
}

/// One `key=value` item of a directive occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentExpr {
    key: String,
    value: ArgumentValue,
}

impl ArgumentExpr {
    /// Pair a key with its value expression.
    pub fn new(key: impl Into<String>, value: ArgumentValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Argument name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Unevaluated value.
    pub fn value(&self) -> &ArgumentValue {
        &self.value
    }

    /// Evaluate against `scope`; unbound paths and bare keys are `null`.
    pub fn evaluate(&self, scope: &dyn Scope) -> Value {
        match &self.value {
            ArgumentValue::Literal(value) => value.clone(),
            ArgumentValue::Path(path) => scope.find(path).unwrap_or(Value::Null),
            ArgumentValue::Absent => Value::Null,
        }
    }
}

/// Arguments of one tag occurrence that have not been evaluated yet.
///
/// Every call to [`Iterator::next`] evaluates exactly one argument against
/// the live render scope. Use [`drain`] to evaluate all of them at once.
pub struct PendingArguments<'a> {
    items: std::slice::Iter<'a, ArgumentExpr>,
    scope: &'a dyn Scope,
}

impl<'a> PendingArguments<'a> {
    /// Arguments waiting to be evaluated against `scope`.
    pub fn new(items: &'a [ArgumentExpr], scope: &'a dyn Scope) -> Self {
        Self {
            items: items.iter(),
            scope,
        }
    }
}

impl Iterator for PendingArguments<'_> {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        Some((item.key().to_string(), item.evaluate(self.scope)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

/// Evaluate every pending argument synchronously.
pub fn drain(pending: PendingArguments<'_>) -> TagArguments {
    pending.collect()
}

/// Evaluated tag arguments, in source order.
///
/// A repeated key keeps its first position and its last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagArguments {
    entries: Vec<(String, Value)>,
}

impl TagArguments {
    /// Empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an argument.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value of one argument.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Name of the first argument.
    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(k, _)| k.as_str())
    }

    /// Arguments in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for TagArguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut arguments = Self::new();
        for (key, value) in iter {
            arguments.insert(key, value);
        }
        arguments
    }
}
