use serde::Serialize;

use crate::models::{CodeBlock, ProjectNode, ProjectStructure, build_tree};
use crate::options::ParserOptions;
use crate::parsing;

/// Everything recovered from one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedProject {
    pub structure: ProjectStructure,
    pub tree: ProjectNode,
}

/// The full response-to-project pipeline with fixed options.
///
/// Holds no state between calls, so one `Parser` can serve any number of
/// responses, from any thread.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Extract, classify and name the code blocks of a raw response.
    pub fn parse_response(&self, text: &str) -> Vec<CodeBlock> {
        parsing::parse_blocks(text, &self.options)
    }

    pub fn detect_structure(&self, blocks: Vec<CodeBlock>) -> ProjectStructure {
        parsing::detect_structure(blocks, &self.options)
    }

    pub fn build_tree(&self, structure: &ProjectStructure) -> ProjectNode {
        build_tree(structure)
    }

    /// Run every stage on `text`.
    pub fn generate(&self, text: &str) -> GeneratedProject {
        let blocks = self.parse_response(text);
        log::debug!("Recovered {} block(s)", blocks.len());
        let structure = self.detect_structure(blocks);
        let tree = self.build_tree(&structure);
        GeneratedProject { structure, tree }
    }
}

/// [`Parser::parse_response`] with default options.
pub fn parse_response(text: &str) -> Vec<CodeBlock> {
    Parser::default().parse_response(text)
}

/// [`Parser::detect_structure`] with default options.
pub fn detect_structure(blocks: Vec<CodeBlock>) -> ProjectStructure {
    Parser::default().detect_structure(blocks)
}
