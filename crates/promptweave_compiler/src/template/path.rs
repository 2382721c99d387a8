//! Variable paths and the scopes they are looked up in.

use crate::template::grammar;
use serde_json::Value;

/// Variable lookup for directive arguments.
pub trait Scope {
    /// Value bound to `path`, if any.
    fn find(&self, path: &VariablePath) -> Option<Value>;
}

impl Scope for serde_json::Map<String, Value> {
    fn find(&self, path: &VariablePath) -> Option<Value> {
        self.get(path.root()).and_then(|root| path.walk(root)).cloned()
    }
}

/// One step of a variable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member
    Key(String),
    /// Array element
    Index(usize),
}

/// A dotted variable path such as `user.tags.0` or `user["tags"][0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariablePath {
    root: String,
    segments: Vec<PathSegment>,
}

impl VariablePath {
    pub(crate) fn new(root: impl Into<String>, segments: Vec<PathSegment>) -> Self {
        Self {
            root: root.into(),
            segments,
        }
    }

    /// Parse a path; `None` when `text` is not a single path.
    ///
    /// ```
    /// use promptweave_compiler::template::{PathSegment, VariablePath};
    ///
    /// let path = VariablePath::parse("user.tags[0]").unwrap();
    /// assert_eq!(path.root(), "user");
    /// assert_eq!(path.segments(), [PathSegment::Key("tags".into()), PathSegment::Index(0)]);
    /// assert!(VariablePath::parse("not a path").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        grammar::variable_path(text.trim())
    }

    /// Top-level variable name.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Members and indices after the root.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Follow the segments from the value bound to the root.
    pub fn walk<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(root, |value, segment| match (segment, value) {
                (PathSegment::Key(k), Value::Object(map)) => map.get(k),
                (PathSegment::Index(i), Value::Array(items)) => items.get(*i),
                (PathSegment::Index(i), Value::Object(map)) => map.get(&i.to_string()),
                _ => None,
            })
    }
}

impl std::fmt::Display for VariablePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.root)?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(k) => write!(f, ".{k}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_members_and_indices() {
        let scope = json!({"user": {"tags": ["a", "b"], "0": "zero"}})
            .as_object()
            .cloned()
            .unwrap();
        let find = |text: &str| scope.find(&VariablePath::parse(text).unwrap());

        assert_eq!(find("user.tags.1"), Some(json!("b")));
        assert_eq!(find("user['tags'][0]"), Some(json!("a")));
        assert_eq!(find("user.0"), Some(json!("zero")));
        assert_eq!(find("user.tags.9"), None);
        assert_eq!(find("nobody"), None);
    }

    #[test]
    fn display_is_canonical() {
        let path = VariablePath::parse("a[\"b\"].2").unwrap();
        assert_eq!(path.to_string(), "a.b[2]");
    }
}
