pub mod code_block;
pub mod language;
pub mod project;
pub mod project_tree;

pub use code_block::CodeBlock;
pub use language::Language;
pub use project::{ProjectStructure, ProjectType};
pub use project_tree::*;
