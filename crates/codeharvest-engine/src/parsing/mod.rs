//! Turning a raw model response into named code blocks.
//!
//! Stages run strictly in order: [`extract`] finds fenced regions and
//! filename hints, [`naming`] (using [`classify`]) names the surviving blocks,
//! and [`structure`] classifies the resulting project.

pub mod actions;
pub mod classify;
pub mod extract;
pub mod naming;
pub mod structure;

use crate::models::CodeBlock;
use crate::options::ParserOptions;

pub use extract::{Extraction, FilenameHint, HintKind, RawBlock, extract_blocks};
pub use naming::resolve_names;
pub use structure::detect_structure;

/// Extract and name every code block in `text`.
pub fn parse_blocks(text: &str, options: &ParserOptions) -> Vec<CodeBlock> {
    resolve_names(extract_blocks(text, options), options)
}
