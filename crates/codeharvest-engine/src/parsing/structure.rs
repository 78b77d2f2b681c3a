//! Project archetype, name and dependency detection.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::classify::has_html_doctype;
use super::naming::sanitize_project_name;
use crate::models::{CodeBlock, Language, ProjectStructure, ProjectType};
use crate::options::ParserOptions;

static REACT_USAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"\bfrom\s+['"]react(?:-dom)?(?:/[\w-]+)?['"]"#,
        r#"|\brequire\(\s*['"]react(?:-dom)?(?:/[\w-]+)?['"]\s*\)"#,
        r"|\bReactDOM\.",
        r"|\bcreateRoot\(",
    ))
    .expect("Invalid react regex")
});

const MANIFEST: &str = "package.json";
const REQUIREMENTS: &str = "requirements.txt";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    dependencies: Option<Value>,
}

/// Classify `blocks` as a project and gather its name and dependencies.
///
/// Never fails: an unparseable `package.json` is kept as a file and only
/// logged.
pub fn detect_structure(blocks: Vec<CodeBlock>, options: &ParserOptions) -> ProjectStructure {
    let project_type = detect_type(&blocks);
    let mut name = project_type
        .default_name()
        .map(str::to_string)
        .unwrap_or_else(|| options.default_project_name.clone());
    let mut dependencies = BTreeSet::new();

    if let Some(manifest) = blocks.iter().find(|b| b.filename == MANIFEST) {
        match serde_json::from_str::<Manifest>(&manifest.content) {
            Ok(parsed) => {
                if let Some(Value::String(manifest_name)) = parsed.name {
                    match sanitize_project_name(&manifest_name, options.max_filename_chars) {
                        Some(safe) => name = safe,
                        None => log::warn!("Ignoring unusable project name {manifest_name:?}"),
                    }
                }
                match parsed.dependencies {
                    Some(Value::Object(deps)) => {
                        dependencies.extend(deps.into_iter().map(|(k, _)| k));
                    }
                    Some(other) => log::warn!(
                        "Ignoring non-object dependencies in {}: {other}",
                        manifest.path
                    ),
                    None => {}
                }
            }
            Err(e) => log::warn!("Could not parse {}: {e}", manifest.path),
        }
    }

    for requirements in blocks.iter().filter(|b| b.filename == REQUIREMENTS) {
        dependencies.extend(requirement_names(&requirements.content));
    }

    ProjectStructure {
        name,
        files: blocks,
        dependencies,
        project_type,
    }
}

fn detect_type(blocks: &[CodeBlock]) -> ProjectType {
    if blocks.iter().any(is_react) {
        ProjectType::React
    } else if blocks
        .iter()
        .any(|b| b.has_extension("html") || has_html_doctype(&b.content))
    {
        ProjectType::Html
    } else if blocks
        .iter()
        .any(|b| b.has_extension("py") || b.language == Language::Python)
    {
        ProjectType::Python
    } else if blocks.iter().any(|b| b.filename == MANIFEST) {
        ProjectType::Nodejs
    } else {
        ProjectType::General
    }
}

fn is_react(block: &CodeBlock) -> bool {
    block.has_extension("jsx") || block.has_extension("tsx") || REACT_USAGE.is_match(&block.content)
}

/// Package names listed in a pip requirements file.
fn requirement_names(content: &str) -> impl Iterator<Item = String> + '_ {
    content.lines().filter_map(|line| {
        let line = line.split(" #").next().unwrap_or_default().trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            return None;
        }
        let end = line
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
            .unwrap_or(line.len());
        let name = &line[..end];
        (!name.is_empty()).then(|| name.to_string())
    })
}
