//! Prose rejection and language inference.
//!
//! Both are regex heuristics. The signature order in [`infer_language`] is
//! significant: JSX contains tags and JavaScript declarations, JSON can look
//! like a CSS rule, so the earlier, more specific signatures must win.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::Language;
use crate::options::ParserOptions;

static CODE_INDICATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)\bfunction\b[\s\w$*]*\(",
        r"|\bclass\s+[A-Za-z_]",
        r"|^\s*import\s+[\w{*'\x22]",
        r"|^\s*from\s+[\w.]+\s+import\b",
        r"|\bdef\s+\w+\s*\(",
        r"|\b(?:var|const|let)\s+[\w$\[{]+\s*=",
        r"|<[A-Za-z!/][^<>\n]*>",
        r"|\{[^{}]*[:;][^{}]*\}",
        r"|\b(?:if|for|while|switch|catch)\s*\(",
        r"|^\s*(?:if|elif|else|for|while|try|except|with)\b[^\n]*:\s*$",
        r"|\bconsole\.\w+",
        r"|\bprint\s*\(",
    ))
    .expect("Invalid code indicator regex")
});

static HTML_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<!doctype\s+html|<html[\s>]|<head[\s>]|<body[\s>]")
        .expect("Invalid html regex")
});

static JSX_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\bimport\s+React\b",
        r#"|\bfrom\s+['"]react['"]"#,
        r#"|\brequire\(\s*['"]react['"]\s*\)"#,
        r"|\buse(?:State|Effect|Context|Reducer|Callback|Memo|Ref|LayoutEffect)\s*\(",
    ))
    .expect("Invalid jsx regex")
});

static JS_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\b[\s\w$*]*\(|\b(?:const|let|var)\s+[\w$\[{]")
        .expect("Invalid javascript regex")
});

static PYTHON_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)^\s*def\s+\w+\s*\(",
        r"|^\s*import\s+[\w.]+(?:\s+as\s+\w+)?\s*$",
        r"|^\s*from\s+[\w.]+\s+import\s",
        r"|\bif\s+__name__\s*==",
    ))
    .expect("Invalid python regex")
});

static CSS_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?m)^[ \t]*[A-Za-z.#*:\[][^{}\n;=()"']*\{[^{}]*?[A-Za-z-]+\s*:\s*[^{};]+;?[^{}]*\}"#,
        r"|^\s*@(?:media|import|keyframes|font-face|charset|supports)\b",
    ))
    .expect("Invalid css regex")
});

static JSON_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^\s*\{.*"(?:name|version)"\s*:"#).expect("Invalid json regex")
});

static JAVA_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)\bpublic\s+(?:(?:static|final|abstract)\s+)*(?:class|interface|enum|void)\b",
        r"|\bSystem\.out\.print",
        r"|^\s*package\s+[\w.]+;",
    ))
    .expect("Invalid java regex")
});

static C_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*#include\s*[<"]|\bint\s+main\s*\(|\bprintf\s*\("#)
        .expect("Invalid c regex")
});

/// True when `text` reads like conversational filler rather than source.
///
/// Text is prose only if no code indicator matches, it has more than
/// `prose_min_tokens` tokens, and the share of long tokens exceeds
/// `prose_long_token_ratio`.
pub fn is_prose(text: &str, options: &ParserOptions) -> bool {
    if CODE_INDICATOR.is_match(text) {
        return false;
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() <= options.prose_min_tokens {
        return false;
    }

    let long = tokens
        .iter()
        .filter(|t| t.chars().count() > options.prose_long_token_len)
        .count();
    long as f64 / tokens.len() as f64 > options.prose_long_token_ratio
}

/// Guess a language from content alone. First matching signature wins.
pub fn infer_language(text: &str) -> Language {
    let signatures: [(&Regex, Language); 8] = [
        (&*HTML_SIGNATURE, Language::Html),
        (&*JSX_SIGNATURE, Language::Jsx),
        (&*JS_SIGNATURE, Language::Javascript),
        (&*PYTHON_SIGNATURE, Language::Python),
        (&*CSS_SIGNATURE, Language::Css),
        (&*JSON_SIGNATURE, Language::Json),
        (&*JAVA_SIGNATURE, Language::Java),
        (&*C_SIGNATURE, Language::C),
    ];

    signatures
        .into_iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, language)| language)
        .unwrap_or(Language::Text)
}

/// A recognised declared tag wins; otherwise the language is inferred.
pub fn resolve_language(declared: Option<&str>, text: &str) -> Language {
    declared
        .and_then(Language::from_tag)
        .unwrap_or_else(|| infer_language(text))
}

/// True for content carrying an HTML doctype.
pub fn has_html_doctype(text: &str) -> bool {
    static DOCTYPE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<!doctype\s+html").expect("Invalid doctype regex"));
    DOCTYPE.is_match(text)
}
