use relative_path::RelativePathBuf;
use serde::Serialize;

use super::Language;

/// A single file recovered from a model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub language: Language,
    /// Sanitized file name, never containing a path separator.
    pub filename: String,
    /// Trimmed block body.
    pub content: String,
    /// `filename`, possibly prefixed by directory segments.
    pub path: RelativePathBuf,
}

impl CodeBlock {
    /// Directory segments of `path`, outermost first.
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        let mut segments: Vec<&str> = self.path.as_str().split('/').collect();
        segments.pop();
        segments.into_iter().filter(|s| !s.is_empty())
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        self.path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(ext))
    }
}
