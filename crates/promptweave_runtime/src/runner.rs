//! The workflow state machine.
//!
//! A run walks a compiled step list as a control-flow graph keyed by step
//! name, threading one [`VariableMap`] through every step and reporting
//! progress to a [`WorkflowObserver`].

use crate::{ProviderRegistry, RuntimeConfig};
use futures_util::StreamExt;
use promptweave_core::{
    GenerationResponse, RunMode, Step, StepExecutionResult, StreamMode, VariableMap,
    WorkflowEvent, control_flow, is_truthy,
};
use promptweave_error::{PromptweaveResult, RuntimeError, RuntimeErrorKind};
use promptweave_interface::{GenerationOptions, WorkflowObserver};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Characters ignored when comparing step names.
const NAME_PUNCTUATION: &str = "-_!@#$%^&*()+={}[]|:\";'<>,.?/\\";

/// Where control goes after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Transition {
    Continue,
    Goto(String),
    Done,
}

#[derive(Debug)]
struct StepOutcome {
    state: VariableMap,
    transition: Transition,
}

/// Executes compiled workflows.
///
/// The runner owns its configuration and provider registry; each call to
/// [`run`](Self::run) is independent and carries its own state.
///
/// # Example
///
/// ```rust,ignore
/// use promptweave_core::{RunMode, StreamMode};
/// use promptweave_runtime::{ProviderRegistry, RuntimeConfig, WorkflowRunner};
///
/// let runner = WorkflowRunner::new(RuntimeConfig::load()?, ProviderRegistry::new());
/// let mut events = Vec::new();
/// let state = runner
///     .run(&steps, Default::default(), &mut |e| events.push(e), RunMode::Simulation, StreamMode::Blocking)
///     .await;
/// ```
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct WorkflowRunner {
    config: RuntimeConfig,
    providers: ProviderRegistry,
}

impl WorkflowRunner {
    /// Create a runner.
    pub fn new(config: RuntimeConfig, providers: ProviderRegistry) -> Self {
        Self { config, providers }
    }

    /// A runner with no providers, able to run in simulation mode only.
    pub fn simulation(config: RuntimeConfig) -> Self {
        Self::new(config, ProviderRegistry::new())
    }

    /// Run a workflow to completion and return the final state.
    ///
    /// Never fails: step failures are reported as `STEP_ERROR` events and
    /// end the run, and a workflow without a PROMPT step ends immediately
    /// with a `WORKFLOW_DONE` event carrying an error.
    #[instrument(
        skip_all,
        fields(steps = steps.len(), mode = %mode, stream = %stream_mode)
    )]
    pub async fn run<O>(
        &self,
        steps: &[Step],
        initial_state: VariableMap,
        observer: &mut O,
        mode: RunMode,
        stream_mode: StreamMode,
    ) -> VariableMap
    where
        O: WorkflowObserver + ?Sized,
    {
        let mut state = initial_state;

        let Some(mut index) = steps.iter().position(Step::is_prompt) else {
            let error = RuntimeError::new(RuntimeErrorKind::NoPromptStep);
            warn!(%error, "Workflow has nothing to run");
            observer.on_event(WorkflowEvent::WorkflowDone {
                final_state: state.clone(),
                error: Some(error.kind.to_string()),
            });
            return state;
        };

        let max_steps = self.config.runtime.max_steps;
        let started = Instant::now();
        let mut executed = 0usize;
        // PROMPT index an implicitly chained AFTER continues from
        let mut chained_from: Option<usize> = None;

        loop {
            let step = &steps[index];

            if executed >= max_steps {
                let error = RuntimeError::new(RuntimeErrorKind::StepLimitExceeded(max_steps));
                error!(step = %step.name(), %error, "Stopping run");
                observer.on_event(WorkflowEvent::StepError {
                    error: error.kind.to_string(),
                    step: step.name().clone(),
                });
                break;
            }
            executed += 1;

            info!(
                step_number = executed,
                step = %step.name(),
                instruction = %step.instruction(),
                "Executing step"
            );
            observer.on_event(if step.is_prompt() {
                WorkflowEvent::StepBefore {
                    step: step.name().clone(),
                }
            } else {
                WorkflowEvent::StepAfter {
                    step: step.name().clone(),
                    state: None,
                }
            });

            let outcome = match self
                .execute_step(step, &state, &mut *observer, mode, stream_mode)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(step = %step.name(), error = %e, "Step failed");
                    observer.on_event(WorkflowEvent::StepError {
                        error: e.message(),
                        step: step.name().clone(),
                    });
                    break;
                }
            };
            state = outcome.state;

            match outcome.transition {
                Transition::Done => {
                    debug!(step = %step.name(), "Workflow marked as done");
                    break;
                }
                Transition::Goto(target) => {
                    chained_from = None;
                    match find_by_name(steps, &target) {
                        Some(next) => {
                            debug!(from = %step.name(), to = %steps[next].name(), "Following GOTO");
                            index = next;
                        }
                        None => {
                            let error =
                                RuntimeError::new(RuntimeErrorKind::StepNotFound(target.clone()));
                            error!(step = %step.name(), %error, "GOTO target missing");
                            observer.on_event(WorkflowEvent::StepError {
                                error: error.kind.to_string(),
                                step: step.name().clone(),
                            });
                            break;
                        }
                    }
                }
                Transition::Continue => {
                    if step.is_prompt() {
                        if let Some(after) = find_after(steps, step.name()) {
                            debug!(step = %step.name(), "Chaining into AFTER step");
                            chained_from = Some(index);
                            index = after;
                            continue;
                        }
                    }

                    let anchor = chained_from.take().unwrap_or(index);
                    match next_prompt(steps, anchor) {
                        Some(next) => index = next,
                        None => {
                            debug!("No more PROMPT steps");
                            break;
                        }
                    }
                }
            }
        }

        info!(
            steps_executed = executed,
            duration_ms = started.elapsed().as_millis() as u64,
            "Workflow completed"
        );
        observer.on_event(WorkflowEvent::WorkflowDone {
            final_state: state.clone(),
            error: None,
        });
        state
    }

    /// Execute one step against the running state.
    ///
    /// Errors leave the caller's state untouched.
    async fn execute_step<O>(
        &self,
        step: &Step,
        state: &VariableMap,
        observer: &mut O,
        mode: RunMode,
        stream_mode: StreamMode,
    ) -> PromptweaveResult<StepOutcome>
    where
        O: WorkflowObserver + ?Sized,
    {
        let mut combined = state.clone();
        combined.extend(
            step.input_values()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        debug!(keys = combined.len(), "Combined step input");

        if !step.is_prompt() {
            observer.on_event(WorkflowEvent::StepAfter {
                step: step.name().clone(),
                state: Some(combined.clone()),
            });
            return Ok(StepOutcome {
                state: combined,
                transition: after_transition(step),
            });
        }

        let started = Instant::now();
        let response = match mode {
            RunMode::Simulation => self.simulate(step, &mut *observer, stream_mode).await,
            RunMode::Execution => self.generate(step, &mut *observer, stream_mode).await?,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let text = response.text.clone();
        debug!(chars = text.chars().count(), elapsed_ms, "Generation finished");

        observer.on_event(WorkflowEvent::StepResultChunk(
            StepExecutionResult::from_response(response),
        ));

        combined.insert(
            control_flow::PREV_GENERATION_CHARS.to_string(),
            Value::from(text.chars().count()),
        );
        combined.insert(
            control_flow::PREV_GENERATION_TIME_MS.to_string(),
            Value::from(elapsed_ms),
        );
        combined.insert(
            control_flow::PREV_GENERATION_TEXT.to_string(),
            Value::String(text.clone()),
        );
        combined.insert(control_flow::RESULT.to_string(), Value::String(text));

        Ok(StepOutcome {
            state: combined,
            transition: Transition::Continue,
        })
    }

    /// Produce mocked or placeholder output without calling a provider.
    async fn simulate<O>(
        &self,
        step: &Step,
        observer: &mut O,
        stream_mode: StreamMode,
    ) -> GenerationResponse
    where
        O: WorkflowObserver + ?Sized,
    {
        let settings = &self.config.simulation;
        let mocked = step
            .output(control_flow::RESULT)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty());

        let text = match mocked {
            Some(text) => {
                debug!(chars = text.len(), "Using mocked result");
                if stream_mode == StreamMode::Stream {
                    for token in simulated_tokens(text) {
                        observer.on_event(WorkflowEvent::StepResultStream {
                            token: token.to_string(),
                        });
                        tokio::time::sleep(settings.token_delay()).await;
                    }
                }
                text.to_string()
            }
            None => {
                if stream_mode == StreamMode::Stream {
                    observer.on_event(WorkflowEvent::StepResultStream {
                        token: settings.placeholder.clone(),
                    });
                }
                settings.placeholder.clone()
            }
        };

        tokio::time::sleep(settings.latency()).await;
        GenerationResponse::simulated(text)
    }

    /// Call the provider selected by the step's model identifier.
    async fn generate<O>(
        &self,
        step: &Step,
        observer: &mut O,
        stream_mode: StreamMode,
    ) -> PromptweaveResult<GenerationResponse>
    where
        O: WorkflowObserver + ?Sized,
    {
        let model_id = step
            .output(control_flow::MODEL)
            .and_then(Value::as_str)
            .filter(|model| !model.is_empty())
            .unwrap_or(self.config.runtime.default_model.as_str());
        let temperature = step
            .output(control_flow::TEMPERATURE)
            .and_then(numeric)
            .unwrap_or(self.config.runtime.default_temperature);

        let (provider, model) = self.providers.resolve(model_id)?;
        let options = GenerationOptions::new(temperature);
        info!(
            provider = provider.provider_name(),
            %model,
            temperature,
            prompt_chars = step.rendered_prompt().len(),
            "Calling generation provider"
        );

        match stream_mode {
            StreamMode::Blocking => {
                provider
                    .generate(step.rendered_prompt(), &model, &options)
                    .await
            }
            StreamMode::Stream => {
                let mut stream = provider
                    .generate_stream(step.rendered_prompt(), &model, &options)
                    .await?;
                let mut text = String::new();
                while let Some(chunk) = stream.next().await {
                    let chunk = chunk?;
                    if !chunk.content.is_empty() {
                        observer.on_event(WorkflowEvent::StepResultStream {
                            token: chunk.content.clone(),
                        });
                        text.push_str(&chunk.content);
                    }
                    if chunk.is_final {
                        break;
                    }
                }
                Ok(GenerationResponse::new(provider.provider_name(), text))
            }
        }
    }
}

/// Control flow requested by an AFTER step's outputs.
fn after_transition(step: &Step) -> Transition {
    if let Some(target) = step
        .output(control_flow::GOTO)
        .and_then(Value::as_str)
        .filter(|target| !target.is_empty())
    {
        return Transition::Goto(target.to_string());
    }
    if step.output(control_flow::DONE).is_some_and(is_truthy) {
        return Transition::Done;
    }
    Transition::Continue
}

/// Number or numeric string.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Step name with whitespace and punctuation removed, lowercased.
///
/// "Write Fiction" and "write-fiction" share the key "writefiction".
pub fn comparator_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !NAME_PUNCTUATION.contains(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// First step of any instruction whose name matches.
fn find_by_name(steps: &[Step], name: &str) -> Option<usize> {
    let key = comparator_key(name);
    steps.iter().position(|s| comparator_key(s.name()) == key)
}

/// First AFTER step whose name matches.
fn find_after(steps: &[Step], name: &str) -> Option<usize> {
    let key = comparator_key(name);
    steps
        .iter()
        .position(|s| !s.is_prompt() && comparator_key(s.name()) == key)
}

/// Next PROMPT strictly after `index`.
fn next_prompt(steps: &[Step], index: usize) -> Option<usize> {
    steps
        .iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, s)| s.is_prompt())
        .map(|(i, _)| i)
}

/// Alternating runs of whitespace and non-whitespace.
fn simulated_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                tokens.push(&text[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}
