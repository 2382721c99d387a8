//! Prompt workflow compiler.
//!
//! Turns template source into a list of named steps:
//!
//! 1. [`segment`] splits the source on `--- PROMPT label ---` /
//!    `--- AFTER label ---` marker lines.
//! 2. Each body is rendered by [`liquid`] with the directives (`field`,
//!    `goto`, `done`, `chars_to_words`, `examples`, plus caller-supplied
//!    tags) registered as custom tags.
//! 3. [`plan`] associates bodies with their markers and collects errors and
//!    merged outputs.
//!
//! # Example
//!
//! ```
//! use promptweave_compiler::{PlanOptions, plan};
//! use promptweave_core::VariableMap;
//! use serde_json::json;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut input = VariableMap::new();
//! input.insert("topic".into(), json!("robots"));
//!
//! let result = plan("Write about {{ topic }}.", &input, &PlanOptions::default()).await;
//! assert_eq!(result.steps()[0].rendered_prompt(), "Write about robots.");
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dialect;
mod options;
mod planner;
mod renderer;
mod segmenter;

pub mod template;

pub use dialect::{
    AsyncTag, ExamplesTag, SyncTag, TagCall, TagContext, TagDefinition, TagInstance, TagRegistry,
    resolve_arguments,
};
pub use options::{PlanOptions, PlanOptionsBuilder, PlanOptionsBuilderError};
pub use planner::{INPUT_MOCK_TAG, MOCK_TAG, PlanResult, plan};
pub use renderer::{RenderedStep, StepRenderer};
pub use segmenter::segment;
pub use template::{PendingArguments, TagArguments, drain, parse_arguments};
