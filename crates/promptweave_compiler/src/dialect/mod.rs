//! Directive dialect layered over the host template engine.

mod builtins;
mod context;
mod engine;
mod registry;
mod resolve;
mod tag;

pub(crate) use engine::render_step;

pub use builtins::ExamplesTag;
pub use context::{TagCall, TagContext, TagInstance};
pub use registry::TagRegistry;
pub use resolve::resolve_arguments;
pub use tag::{AsyncTag, SyncTag, TagDefinition};
