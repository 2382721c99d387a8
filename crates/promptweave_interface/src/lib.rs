//! Trait definitions for the promptweave collaborators.
//!
//! The compiler and runtime talk to the outside world only through the
//! traits in this crate: text generation, example retrieval and event
//! observation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{ExampleRetriever, GenerationProvider, WorkflowObserver};
pub use types::{FinishReason, GenerationOptions, StreamChunk, TokenStream};
