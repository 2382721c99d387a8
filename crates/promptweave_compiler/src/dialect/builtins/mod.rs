//! Directives every planning pass provides.

mod chars_to_words;
mod done;
mod examples;
mod field;
mod goto;

pub use examples::ExamplesTag;

use crate::dialect::{TagDefinition, TagRegistry};

pub(crate) fn register(registry: &mut TagRegistry) {
    registry.register("field", TagDefinition::sync(field::field));
    registry.register("goto", TagDefinition::sync(goto::goto));
    registry.register("done", TagDefinition::sync(done::done));
    registry.register("chars_to_words", TagDefinition::sync(chars_to_words::chars_to_words));
    registry.register("wordcount", TagDefinition::sync(chars_to_words::chars_to_words));
    registry.register("examples", TagDefinition::from_async(ExamplesTag));
}
