//! Renders step bodies with `liquid`, running directives as custom tags.
//!
//! Liquid renders synchronously. Sync directives run in place. An async
//! directive suspends the pass: the render is abandoned, the directive is
//! awaited outside the engine, and the body is rendered again from a fresh
//! context with the awaited result replayed at the same visit.

use crate::PlanOptions;
use crate::dialect::{
    AsyncTag, TagCall, TagContext, TagDefinition, TagInstance, TagRegistry, resolve_arguments,
};
use crate::template::{
    Occurrence, PendingArguments, RuntimeScope, TagArguments, drain, extract_directives, globals,
    to_liquid,
};
use liquid_core::model::KString;
use liquid_core::{Language, ParseTag, Renderable, Runtime, TagReflection, TagTokenIter};
use promptweave_core::VariableMap;
use promptweave_error::{PromptweaveError, PromptweaveResult, TemplateError, TemplateErrorKind};
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

/// Upper bound on awaited directive calls while rendering one body.
const MAX_AWAITED_CALLS: usize = 1024;

/// Render `body`, leaving the final directive outputs in `context`.
///
/// On failure `context` holds the outputs written before the failing
/// directive.
#[tracing::instrument(skip_all, fields(step = %context.step_name()))]
pub(crate) async fn render_step(
    registry: &TagRegistry,
    options: &PlanOptions,
    context: &mut TagContext,
    body: &str,
) -> PromptweaveResult<String> {
    let (source, occurrences) = extract_directives(body, |name| registry.contains(name))?;
    let directives = occurrences
        .into_iter()
        .filter_map(|occurrence| {
            let definition = registry.get(&occurrence.name)?.clone();
            Some((occurrence, definition))
        })
        .collect();
    let session = Arc::new(RenderSession {
        options: options.clone(),
        directives,
        state: Mutex::new(PassState::default()),
    });

    let template = session.parse(&source)?;
    let globals = globals(context.input_values(), body)?;
    let step = context.step_name().clone();
    let input = context.input_values().clone();

    let mut awaited = 0;
    loop {
        session.state()?.begin_pass(&step, &input);
        let rendered = template.render(&globals).map_err(|e| e.to_string());

        let (partial, failure, suspended) = {
            let mut state = session.state()?;
            (
                std::mem::take(&mut state.context),
                state.failure.take(),
                state.suspended.take(),
            )
        };
        *context = partial;

        let message = match rendered {
            Ok(text) => return Ok(text),
            Err(message) => message,
        };
        if let Some(failure) = failure {
            return Err(failure);
        }
        let Some(suspension) = suspended else {
            return Err(TemplateError::new(TemplateErrorKind::Render(message)).into());
        };

        awaited += 1;
        if awaited > MAX_AWAITED_CALLS {
            return Err(TemplateError::new(TemplateErrorKind::Render(format!(
                "more than {MAX_AWAITED_CALLS} awaited directive calls"
            )))
            .into());
        }

        let reply = suspension.run(context, &session.options).await?;
        session.state()?.replies.insert(suspension.key, reply);
    }
}

/// Directives of one body plus the state shared by their invocations.
struct RenderSession {
    options: PlanOptions,
    directives: Vec<(Occurrence, TagDefinition)>,
    state: Mutex<PassState>,
}

impl RenderSession {
    fn parse(self: &Arc<Self>, source: &str) -> PromptweaveResult<liquid::Template> {
        let names: BTreeSet<&str> = self
            .directives
            .iter()
            .map(|(occurrence, _)| occurrence.name.as_str())
            .collect();

        let mut builder = liquid::ParserBuilder::with_stdlib();
        for name in names {
            builder = builder.tag(DirectiveTag {
                name: name.to_string(),
                session: Arc::clone(self),
            });
        }

        builder
            .build()
            .and_then(|parser| parser.parse(source))
            .map_err(|e| TemplateError::new(TemplateErrorKind::Syntax(e.to_string())).into())
    }

    fn state(&self) -> PromptweaveResult<MutexGuard<'_, PassState>> {
        self.state.lock().map_err(|_| {
            TemplateError::new(TemplateErrorKind::Render(
                "directive state was poisoned".to_string(),
            ))
            .into()
        })
    }

    fn render_state(&self) -> liquid_core::Result<MutexGuard<'_, PassState>> {
        self.state
            .lock()
            .map_err(|_| liquid_core::Error::with_msg("directive state was poisoned"))
    }
}

/// What one render pass has done so far.
#[derive(Default)]
struct PassState {
    context: TagContext,
    instances: HashMap<usize, TagInstance>,
    /// Times each occurrence has rendered in this pass
    visits: HashMap<usize, usize>,
    /// Awaited results by (occurrence, visit); kept across passes
    replies: HashMap<(usize, usize), AsyncReply>,
    suspended: Option<Suspension>,
    failure: Option<PromptweaveError>,
}

impl PassState {
    fn begin_pass(&mut self, step: &str, input: &VariableMap) {
        self.context = TagContext::new(step, input.clone());
        self.instances.clear();
        self.visits.clear();
        self.suspended = None;
        self.failure = None;
    }
}

struct AsyncReply {
    arguments: TagArguments,
    text: Option<String>,
    output_values: VariableMap,
    instance: TagInstance,
}

/// An async directive call the current pass stopped at.
struct Suspension {
    key: (usize, usize),
    name: String,
    directive: Arc<dyn AsyncTag>,
    arguments: TagArguments,
    instance: TagInstance,
}

impl Suspension {
    async fn run(
        &self,
        context: &mut TagContext,
        options: &PlanOptions,
    ) -> PromptweaveResult<AsyncReply> {
        let mut instance = self.instance;
        tracing::trace!(tag = %self.name, occurrence = self.key.0, visit = self.key.1, "Awaiting directive");
        let text = self
            .directive
            .call(TagCall {
                name: &self.name,
                context: &mut *context,
                arguments: &self.arguments,
                options,
                instance: &mut instance,
            })
            .await?;
        Ok(AsyncReply {
            arguments: self.arguments.clone(),
            text,
            output_values: context.output_values().clone(),
            instance,
        })
    }
}

/// Parses `{% name <occurrence> %}` placeholders for one directive name.
#[derive(Clone)]
struct DirectiveTag {
    name: String,
    session: Arc<RenderSession>,
}

impl TagReflection for DirectiveTag {
    fn tag(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "promptweave directive"
    }
}

impl ParseTag for DirectiveTag {
    fn parse(
        &self,
        mut arguments: TagTokenIter<'_>,
        _options: &Language,
    ) -> liquid_core::Result<Box<dyn Renderable>> {
        let id = arguments
            .next()
            .and_then(|token| token.as_str().parse::<usize>().ok())
            .filter(|id| {
                self.session
                    .directives
                    .get(*id)
                    .is_some_and(|(occurrence, _)| occurrence.name == self.name)
            })
            .ok_or_else(|| {
                liquid_core::Error::with_msg(format!("Directive '{}' has no parsed arguments", self.name))
            })?;

        Ok(Box::new(DirectiveInvocation {
            id,
            session: Arc::clone(&self.session),
        }))
    }

    fn reflection(&self) -> &dyn TagReflection {
        self
    }
}

/// One directive occurrence inside a parsed template.
struct DirectiveInvocation {
    id: usize,
    session: Arc<RenderSession>,
}

impl std::fmt::Debug for DirectiveInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveInvocation")
            .field("id", &self.id)
            .finish()
    }
}

impl DirectiveInvocation {
    fn invoke(
        &self,
        state: &mut PassState,
        occurrence: &Occurrence,
        definition: &TagDefinition,
        raw: TagArguments,
    ) -> liquid_core::Result<Option<String>> {
        let PassState {
            context,
            instances,
            visits,
            replies,
            suspended,
            failure,
        } = state;
        let arguments = resolve_arguments(&raw, context.output_values(), context.input_values());

        match definition {
            TagDefinition::Sync(directive) => {
                let call = TagCall {
                    name: &occurrence.name,
                    context,
                    arguments: &arguments,
                    options: &self.session.options,
                    instance: instances.entry(self.id).or_default(),
                };
                directive.call(call).map_err(|e| {
                    let message = e.message();
                    *failure = Some(e);
                    liquid_core::Error::with_msg(message)
                })
            }
            TagDefinition::Async(directive) => {
                let visit = visits.entry(self.id).or_insert(0);
                let key = (self.id, *visit);
                *visit += 1;

                match replies.get(&key) {
                    Some(reply) if reply.arguments == arguments => {
                        *context.output_values_mut() = reply.output_values.clone();
                        instances.insert(self.id, reply.instance);
                        Ok(reply.text.clone())
                    }
                    _ => {
                        *suspended = Some(Suspension {
                            key,
                            name: occurrence.name.clone(),
                            directive: Arc::clone(directive),
                            arguments,
                            instance: instances.get(&self.id).copied().unwrap_or_default(),
                        });
                        Err(liquid_core::Error::with_msg(format!(
                            "Directive '{}' is awaiting",
                            occurrence.name
                        )))
                    }
                }
            }
        }
    }
}

impl Renderable for DirectiveInvocation {
    fn render_to(&self, writer: &mut dyn Write, runtime: &dyn Runtime) -> liquid_core::Result<()> {
        let (occurrence, definition) = &self.session.directives[self.id];
        let raw = drain(PendingArguments::new(
            &occurrence.arguments,
            &RuntimeScope(runtime),
        ));

        let text = {
            let mut state = self.session.render_state()?;
            let text = self.invoke(&mut state, occurrence, definition, raw)?;
            for (key, value) in state.context.output_values() {
                runtime.set_global(KString::from_string(key.clone()), to_liquid(value)?);
            }
            text
        };

        if let Some(text) = text {
            writer
                .write_all(text.as_bytes())
                .map_err(|e| liquid_core::Error::with_msg(e.to_string()))?;
        }
        Ok(())
    }
}
