//! Promptweave - Liquid prompt templates compiled into LLM workflows.
//!
//! A promptweave source file is a Liquid template split into named steps by
//! marker lines:
//!
//! ```text
//! --- PROMPT write ---
//! {% field topic="{ default: 'robots' }" %}
//! Write a short story about {{ topic }}.
//! --- AFTER write ---
//! {% done %}
//! ```
//!
//! [`plan`] compiles the source into [`Step`]s; [`WorkflowRunner`] executes
//! them, calling a [`GenerationProvider`] for every PROMPT step and following
//! the `goto`/`done` directives of AFTER steps.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use promptweave::{PlanOptions, RunMode, RuntimeConfig, StreamMode, VariableMap, WorkflowRunner, plan};
//!
//! let planned = plan(&source, &VariableMap::new(), &PlanOptions::default()).await;
//! let runner = WorkflowRunner::simulation(RuntimeConfig::load()?);
//! let state = runner
//!     .run(planned.steps(), VariableMap::new(), &mut |event| println!("{}", event.kind()), RunMode::Simulation, StreamMode::Blocking)
//!     .await;
//! ```
//!
//! # Crates
//!
//! - `promptweave_error` - error types
//! - `promptweave_core` - steps, events and variable maps
//! - `promptweave_interface` - provider, retriever and observer traits
//! - `promptweave_compiler` - segmenter, template engine, directives, planner
//! - `promptweave_retrieval` - file-corpus example retrieval
//! - `promptweave_runtime` - workflow runner and configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod input;

pub use input::{input_map, parse_input};

// Re-export error types
pub use promptweave_error::{
    ConfigError, DirectiveError, DirectiveErrorKind, IoError, JsonError, PromptweaveError,
    PromptweaveErrorKind,
    PromptweaveResult, ProviderError, ProviderErrorKind, RetrievalError, RetrievalErrorKind,
    RuntimeError, RuntimeErrorKind, TemplateError, TemplateErrorKind,
};

// Re-export core types
pub use promptweave_core::{
    EventKind, GenerationResponse, GenerationResult, Instruction, LogFormat, ResultFormat, RunMode,
    Step, StepBuilder, StepExecutionResult, StreamMode, TemplateSegment, TokenUsage, VariableMap,
    WorkflowEvent, control_flow, init_logging, is_truthy, value_to_text,
};

// Re-export collaborator traits
pub use promptweave_interface::{
    ExampleRetriever, FinishReason, GenerationOptions, GenerationProvider, StreamChunk,
    TokenStream, WorkflowObserver,
};

// Re-export the compiler
pub use promptweave_compiler::{
    AsyncTag, INPUT_MOCK_TAG, MOCK_TAG, PlanOptions, PlanOptionsBuilder, PlanResult, SyncTag,
    TagCall, TagContext, TagDefinition, TagRegistry, plan, segment,
};

// Re-export retrieval
pub use promptweave_retrieval::{Corpus, FileCorpusRetriever};

// Re-export the runtime
pub use promptweave_runtime::{
    ProviderRegistry, RuntimeConfig, RuntimeSettings, SimulationSettings, WorkflowRunner,
};
