//! Segmenter output.

use crate::Instruction;
use serde::{Deserialize, Serialize};

/// One piece of a segmented template source.
///
/// Produced by the segmenter and consumed only by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TemplateSegment {
    /// A `--- INSTRUCTION label ---` line.
    Marker {
        /// Instruction named by the marker
        instruction: Instruction,
        /// Free text between the instruction and the closing dashes
        label: String,
    },
    /// Template text between markers.
    Body {
        /// Instruction of the marker active when this text started, if any
        instruction: Option<Instruction>,
        /// Label of the marker active when this text started (empty if none)
        label: String,
        /// Template text with trailing whitespace removed
        text: String,
    },
}

impl TemplateSegment {
    /// Returns true for marker segments.
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Marker { .. })
    }
}
