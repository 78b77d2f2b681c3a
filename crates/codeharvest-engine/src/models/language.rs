use serde::{Serialize, Serializer};
use std::fmt;

/// Source language of an extracted block.
///
/// Every variant maps to a canonical tag, a file extension and the role name
/// used when a file name has to be synthesized. `Other` carries a declared tag
/// that is not recognised; it is kept verbatim but written out as `.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    Html,
    Jsx,
    Tsx,
    Javascript,
    Typescript,
    Python,
    Css,
    Json,
    Java,
    C,
    Cpp,
    Rust,
    Go,
    Shell,
    Yaml,
    Markdown,
    Sql,
    Text,
    Other(String),
}

impl Language {
    /// Normalise a declared fence tag.
    ///
    /// Returns `None` for tags that carry no information (empty, `text`,
    /// `plaintext`, `txt`) so the caller can fall back to inference.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        let language = match tag.as_str() {
            "" | "text" | "plaintext" | "plain" | "txt" => return None,
            "html" | "htm" | "xhtml" => Self::Html,
            "jsx" => Self::Jsx,
            "tsx" => Self::Tsx,
            "javascript" | "js" | "mjs" | "cjs" | "node" => Self::Javascript,
            "typescript" | "ts" => Self::Typescript,
            "python" | "py" | "python3" => Self::Python,
            "css" => Self::Css,
            "json" => Self::Json,
            "java" => Self::Java,
            "c" | "h" => Self::C,
            "cpp" | "c++" | "cc" | "cxx" | "hpp" => Self::Cpp,
            "rust" | "rs" => Self::Rust,
            "go" | "golang" => Self::Go,
            "shell" | "sh" | "bash" | "zsh" => Self::Shell,
            "yaml" | "yml" => Self::Yaml,
            "markdown" | "md" => Self::Markdown,
            "sql" => Self::Sql,
            _ => Self::Other(tag),
        };
        Some(language)
    }

    /// Map a file extension (without the dot) back to a language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "h" => Some(Self::C),
            other => match Self::from_tag(other)? {
                Self::Other(_) => None,
                language => Some(language),
            },
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::Jsx => "jsx",
            Self::Tsx => "tsx",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Python => "python",
            Self::Css => "css",
            Self::Json => "json",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Shell => "shell",
            Self::Yaml => "yaml",
            Self::Markdown => "markdown",
            Self::Sql => "sql",
            Self::Text => "text",
            Self::Other(tag) => tag,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Jsx => "jsx",
            Self::Tsx => "tsx",
            Self::Javascript => "js",
            Self::Typescript => "ts",
            Self::Python => "py",
            Self::Css => "css",
            Self::Json => "json",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Rust => "rs",
            Self::Go => "go",
            Self::Shell => "sh",
            Self::Yaml => "yaml",
            Self::Markdown => "md",
            Self::Sql => "sql",
            Self::Text | Self::Other(_) => "txt",
        }
    }

    /// Base name used for synthesized file names (`script.js`, `main2.py`, ...).
    pub fn role_name(&self) -> &'static str {
        match self {
            Self::Javascript => "script",
            Self::Jsx | Self::Tsx => "component",
            Self::Python => "main",
            Self::Html => "index",
            Self::Css => "styles",
            Self::Json => "data",
            Self::Typescript
            | Self::Java
            | Self::C
            | Self::Cpp
            | Self::Rust
            | Self::Go
            | Self::Shell
            | Self::Yaml
            | Self::Markdown
            | Self::Sql
            | Self::Text
            | Self::Other(_) => "file",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("js", Language::Javascript)]
    #[case("JavaScript", Language::Javascript)]
    #[case("py", Language::Python)]
    #[case("c++", Language::Cpp)]
    #[case("yml", Language::Yaml)]
    #[case("htm", Language::Html)]
    #[case("bash", Language::Shell)]
    fn aliases_normalise(#[case] tag: &str, #[case] expected: Language) {
        assert_eq!(Language::from_tag(tag), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("text")]
    #[case("plaintext")]
    #[case("  ")]
    fn uninformative_tags_are_undeclared(#[case] tag: &str) {
        assert_eq!(Language::from_tag(tag), None);
    }

    #[test]
    fn unknown_tag_is_kept_but_written_as_txt() {
        let language = Language::from_tag("Kotlin").unwrap();
        assert_eq!(language, Language::Other("kotlin".to_string()));
        assert_eq!(language.tag(), "kotlin");
        assert_eq!(language.extension(), "txt");
        assert_eq!(language.role_name(), "file");
    }

    #[rstest]
    #[case(Language::Javascript, "script", "js")]
    #[case(Language::Jsx, "component", "jsx")]
    #[case(Language::Tsx, "component", "tsx")]
    #[case(Language::Python, "main", "py")]
    #[case(Language::Html, "index", "html")]
    #[case(Language::Css, "styles", "css")]
    #[case(Language::Json, "data", "json")]
    #[case(Language::Java, "file", "java")]
    #[case(Language::Text, "file", "txt")]
    fn role_and_extension(#[case] language: Language, #[case] role: &str, #[case] ext: &str) {
        assert_eq!(language.role_name(), role);
        assert_eq!(language.extension(), ext);
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(Language::from_extension("jsx"), Some(Language::Jsx));
        assert_eq!(Language::from_extension("PY"), Some(Language::Python));
        assert_eq!(Language::from_extension("txt"), Some(Language::Text));
        assert_eq!(Language::from_extension("lock"), None);
    }

    #[test]
    fn serializes_as_tag() {
        let json = serde_json::to_string(&Language::Javascript).unwrap();
        assert_eq!(json, "\"javascript\"");
    }
}
