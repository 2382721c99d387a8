//! Step instruction kinds.

use serde::{Deserialize, Serialize};

/// What a compiled step does when the runtime reaches it.
///
/// Marker lines name the instruction case-insensitively
/// (`--- prompt write ---` and `--- PROMPT write ---` are the same).
///
/// # Examples
///
/// ```
/// use promptweave_core::Instruction;
/// use std::str::FromStr;
///
/// assert_eq!(Instruction::from_str("after").unwrap(), Instruction::After);
/// assert_eq!(Instruction::Prompt.to_string(), "PROMPT");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Instruction {
    /// Render the body and send it to a generation provider.
    #[default]
    Prompt,
    /// Inspect control-flow variables after the matching PROMPT ran.
    After,
}
