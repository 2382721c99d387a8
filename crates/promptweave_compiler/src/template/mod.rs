//! Directive arguments and the `liquid` host engine glue.
//!
//! Step bodies are rendered by [`liquid`] with its standard tags and filters.
//! Directive argument text is parsed here with a small `nom` grammar before
//! the host engine sees the body, and evaluated lazily against the render
//! scope when the directive runs.

mod arguments;
mod grammar;
mod host;
mod path;

pub use arguments::{ArgumentExpr, ArgumentValue, PendingArguments, TagArguments, drain};
pub use grammar::parse_arguments;
pub use path::{PathSegment, Scope, VariablePath};

pub(crate) use host::{Occurrence, RuntimeScope, extract_directives, globals, to_liquid};
