use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use super::CodeBlock;

/// Coarse project archetype, used to name and scaffold a generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    React,
    Html,
    Python,
    Nodejs,
    General,
}

impl ProjectType {
    /// Project name used when no manifest declares one.
    pub fn default_name(self) -> Option<&'static str> {
        match self {
            Self::React => Some("react-app"),
            Self::Html => Some("html-project"),
            Self::Python => Some("python-project"),
            Self::Nodejs => Some("nodejs-project"),
            Self::General => None,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::React => "react",
            Self::Html => "html",
            Self::Python => "python",
            Self::Nodejs => "nodejs",
            Self::General => "general",
        };
        f.write_str(s)
    }
}

/// Every file recovered from one response, plus what was learned about them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStructure {
    pub name: String,
    pub files: Vec<CodeBlock>,
    pub dependencies: BTreeSet<String>,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
}

impl ProjectStructure {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file(&self, path: &str) -> Option<&CodeBlock> {
        self.files.iter().find(|f| f.path.as_str() == path)
    }
}
