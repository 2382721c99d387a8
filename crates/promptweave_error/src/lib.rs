//! Error types for promptweave.
//!
//! This crate provides the error types shared by the compiler, the runtime
//! and the collaborators they talk to.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use promptweave_error::{PromptweaveResult, ProviderError, ProviderErrorKind};
//!
//! fn pick_model() -> PromptweaveResult<String> {
//!     Err(ProviderError::new(ProviderErrorKind::UnsupportedModel("mistral/large".into())))?
//! }
//!
//! match pick_model() {
//!     Ok(model) => println!("Using: {}", model),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod directive;
mod error;
mod io;
mod json;
mod provider;
mod retrieval;
mod runtime;
mod template;

pub use config::ConfigError;
pub use directive::{DirectiveError, DirectiveErrorKind};
pub use error::{PromptweaveError, PromptweaveErrorKind, PromptweaveResult};
pub use io::IoError;
pub use json::JsonError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use retrieval::{RetrievalError, RetrievalErrorKind};
pub use runtime::{RuntimeError, RuntimeErrorKind};
pub use template::{TemplateError, TemplateErrorKind};
