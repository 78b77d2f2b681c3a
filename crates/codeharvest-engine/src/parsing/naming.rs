//! File name resolution for extracted blocks.
//!
//! Resolution order per block: a path declared by an action envelope, the next
//! unused filename hint, a name derived from the content, and finally a
//! synthesized `<role><n>.<ext>` name.

use regex::Regex;
use relative_path::RelativePathBuf;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::classify::{has_html_doctype, is_prose, resolve_language};
use super::extract::{Extraction, RawBlock};
use crate::models::{CodeBlock, Language};
use crate::options::ParserOptions;

// A name only counts when declaration syntax follows it.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\bfunction(?:\s*\*\s*|\s+)([A-Za-z_$][\w$]*)\s*\(",
        r"|\bdef\s+([A-Za-z_]\w*)\s*\(",
        r"|\bclass\s+([A-Za-z_$][\w$]*)\s*(?:[{(:]|\b(?:extends|implements)\b)",
    ))
    .expect("Invalid declaration regex")
});

static ARROW_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:const|let)\s+([A-Z][\w$]*)\s*=\s*(?:\([^)]*\)|[\w$]+)\s*=>")
        .expect("Invalid component regex")
});

static MANIFEST_KEYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:dependencies|devDependencies|peerDependencies|scripts)"\s*:"#)
        .expect("Invalid manifest regex")
});

static NAME_AND_VERSION: LazyLock<(Regex, Regex)> = LazyLock::new(|| {
    (
        Regex::new(r#""name"\s*:"#).expect("Invalid name regex"),
        Regex::new(r#""version"\s*:"#).expect("Invalid version regex"),
    )
});

const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Name every surviving block, dropping prose and degenerate names.
pub fn resolve_names(extraction: Extraction, options: &ParserOptions) -> Vec<CodeBlock> {
    let mut resolver = NameResolver::new(extraction.hints.into_iter().map(|h| h.path), options);
    extraction
        .blocks
        .into_iter()
        .filter_map(|block| resolver.resolve(block))
        .collect()
}

struct NameResolver<'a> {
    options: &'a ParserOptions,
    hints: std::vec::IntoIter<String>,
    used: HashSet<String>,
    counter: usize,
}

impl<'a> NameResolver<'a> {
    fn new(hints: impl Iterator<Item = String>, options: &'a ParserOptions) -> Self {
        Self {
            options,
            hints: hints.collect::<Vec<_>>().into_iter(),
            used: HashSet::new(),
            counter: 1,
        }
    }

    fn resolve(&mut self, block: RawBlock) -> Option<CodeBlock> {
        let content = block.raw_text.trim().to_string();
        let mut language = resolve_language(block.declared_language.as_deref(), &content);

        if is_prose(&content, self.options) {
            log::debug!("Dropping block at offset {}: prose", block.offset);
            return None;
        }

        let explicit = block
            .declared_path
            .as_deref()
            .map(str::to_string)
            .or_else(|| self.hints.next());

        let path = match explicit {
            Some(hint) => {
                let path = split_hint_path(&hint, self.options.max_filename_chars);
                // An undeclared block takes its language from the hinted extension
                if block.declared_language.is_none()
                    && let Some(from_ext) = path
                        .as_ref()
                        .and_then(|p| p.extension())
                        .and_then(Language::from_extension)
                {
                    language = from_ext;
                }
                path
            }
            None => {
                let derived = derive_name(&content, &language)
                    .map(|name| sanitize_filename(&name, self.options.max_filename_chars))
                    .filter(|name| is_valid_filename(name, self.options.max_filename_chars))
                    .filter(|name| !self.used.contains(name));
                let name = derived.unwrap_or_else(|| self.synthesize(&language));
                Some(RelativePathBuf::from(name))
            }
        };

        let Some(path) = path else {
            log::debug!(
                "Dropping block at offset {}: no usable file name",
                block.offset
            );
            return None;
        };
        let filename = path.file_name().unwrap_or_default().to_string();
        if !is_valid_filename(&filename, self.options.max_filename_chars) {
            log::debug!("Dropping block at offset {}: invalid name {filename:?}", block.offset);
            return None;
        }

        self.used.insert(path.as_str().to_string());
        Some(CodeBlock {
            language,
            filename,
            content,
            path,
        })
    }

    fn synthesize(&mut self, language: &Language) -> String {
        loop {
            let suffix = if self.counter == 1 {
                String::new()
            } else {
                self.counter.to_string()
            };
            let name = format!("{}{}.{}", language.role_name(), suffix, language.extension());
            self.counter += 1;
            if !self.used.contains(&name) {
                return name;
            }
        }
    }
}

/// Content-derived file name, if a naming convention applies.
fn derive_name(content: &str, language: &Language) -> Option<String> {
    if has_html_doctype(content) {
        return Some("index.html".to_string());
    }
    if looks_like_manifest(content) {
        return Some("package.json".to_string());
    }
    if let Some(name) = declared_name(content, language) {
        return Some(format!("{name}.{}", language.extension()));
    }
    if *language == Language::Css {
        return Some("styles.css".to_string());
    }
    None
}

/// First declared function/class/def name, for languages where it names files.
fn declared_name<'t>(content: &'t str, language: &Language) -> Option<&'t str> {
    match language {
        Language::Html
        | Language::Css
        | Language::Json
        | Language::Yaml
        | Language::Markdown
        | Language::Sql
        | Language::Text
        | Language::Other(_) => return None,
        _ => {}
    }

    let declaration = DECLARATION
        .captures(content)
        .and_then(|c| c.iter().skip(1).flatten().next());
    let component = matches!(language, Language::Jsx | Language::Tsx)
        .then(|| ARROW_COMPONENT.captures(content).and_then(|c| c.get(1)))
        .flatten();

    let earliest = match (declaration, component) {
        (Some(d), Some(c)) => Some(if c.start() < d.start() { c } else { d }),
        (d, c) => d.or(c),
    };
    earliest.map(|m| m.as_str())
}

fn looks_like_manifest(content: &str) -> bool {
    let trimmed = content.trim_start();
    if !trimmed.starts_with('{') {
        return false;
    }
    let (name, version) = &*NAME_AND_VERSION;
    MANIFEST_KEYS.is_match(trimmed) || (name.is_match(trimmed) && version.is_match(trimmed))
}

/// Turn a hinted path into a safe relative path.
///
/// Backslashes count as separators; every segment is sanitized and empty,
/// `.` and `..` segments are dropped. Returns `None` when nothing
/// usable is left.
pub fn split_hint_path(hint: &str, max_chars: usize) -> Option<RelativePathBuf> {
    let normalized = hint.replace('\\', "/");
    let segments: Vec<String> = normalized
        .split('/')
        .map(|s| sanitize_filename(s, max_chars))
        .filter(|s| !s.is_empty() && s != "." && s != "..")
        .collect();

    let filename = segments.last()?;
    if !is_valid_filename(filename, max_chars) {
        return None;
    }
    Some(RelativePathBuf::from(segments.join("/")))
}

/// Strip line breaks, collapse whitespace to `_`, drop characters that are
/// unsafe in file names and truncate to `max_chars`.
pub fn sanitize_filename(name: &str, max_chars: usize) -> String {
    let single_line: String = name.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    single_line
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c) && !matches!(c, '/' | '\\'))
        .take(max_chars)
        .collect()
}

/// A project name usable as a single directory name, if anything safe is
/// left after sanitizing.
pub fn sanitize_project_name(name: &str, max_chars: usize) -> Option<String> {
    let name = sanitize_filename(name, max_chars);
    is_valid_filename(&name, max_chars).then_some(name)
}

fn is_valid_filename(name: &str, max_chars: usize) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['\n', '\r', '/', '\\'])
        && name.chars().count() <= max_chars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::extract::extract_blocks;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn names(text: &str) -> Vec<String> {
        let options = ParserOptions::default();
        resolve_names(extract_blocks(text, &options), &options)
            .into_iter()
            .map(|b| b.path.to_string())
            .collect()
    }

    #[rstest]
    #[case("my file.js", "my_file.js")]
    #[case("  spaced   out  .py ", "spaced_out_.py")]
    #[case("a<b>c:d\"e|f?g*h.txt", "abcdefgh.txt")]
    #[case("line\nbreak.js", "linebreak.js")]
    #[case("crlf\r\n.js", "crlf.js")]
    fn sanitization(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(input, 100), expected);
    }

    #[rstest]
    #[case("counter-app", Some("counter-app"))]
    #[case("/tmp/owned", Some("tmpowned"))]
    #[case("../../etc", Some("....etc"))]
    #[case("..", None)]
    #[case(" . ", None)]
    #[case("///", None)]
    fn project_names(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(sanitize_project_name(input, 100).as_deref(), expected);
    }

    #[test]
    fn sanitization_truncates() {
        let long = "a".repeat(150);
        assert_eq!(sanitize_filename(&long, 100).chars().count(), 100);
    }

    #[rstest]
    #[case("foo/bar.js", Some("foo/bar.js"))]
    #[case("./src/app.js", Some("src/app.js"))]
    #[case("/abs/path.py", Some("abs/path.py"))]
    #[case("../../etc/passwd.txt", Some("etc/passwd.txt"))]
    #[case("src\\win\\main.c", Some("src/win/main.c"))]
    #[case("a//b/./c.rs", Some("a/b/c.rs"))]
    #[case("..", None)]
    #[case("***", None)]
    fn hint_paths(#[case] hint: &str, #[case] expected: Option<&str>) {
        let path = split_hint_path(hint, 100);
        assert_eq!(path.as_ref().map(|p| p.as_str()), expected);
    }

    #[test]
    fn function_name_rule() {
        assert_eq!(
            names("Here's code:\n```js\nfunction add(a,b){return a+b;}\n```"),
            vec!["add.js"]
        );
    }

    #[test]
    fn python_def_and_class_rule() {
        assert_eq!(
            names("```python\nclass Greeter:\n    def hello(self):\n        print('hi')\n```"),
            vec!["Greeter.py"]
        );
    }

    #[rstest]
    #[case("```js\n// Simple class to manage the state\nconst x = 1;\n```", "script.js")]
    #[case("```python\n# define the function we need\nx = compute(1)\n```", "main.py")]
    #[case("```js\nconst functions = [];\nfunction* ids() { yield 1; }\n```", "ids.js")]
    #[case("```ts\nexport class Store extends Base {}\n```", "Store.ts")]
    fn declarations_need_declaration_syntax(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(names(text), vec![expected]);
    }

    #[test]
    fn envelope_prose_is_dropped() {
        let text = r#"```json
{"actions":[
  {"type":"create_file","path":"NOTES.md","content":"I think you should consider using a state management library for this."},
  {"type":"create_file","path":"src/app.js","content":"console.log('ready');"}
]}
```"#;
        assert_eq!(names(text), vec!["src/app.js"]);
    }

    #[test]
    fn arrow_component_rule() {
        assert_eq!(
            names("```jsx\nconst TodoList = ({ items }) => <ul>{items}</ul>;\n```"),
            vec!["TodoList.jsx"]
        );
    }

    #[test]
    fn doctype_and_css_rules() {
        let text = "```html\n<!DOCTYPE html>\n<html><body><script>function init(){}</script></body></html>\n```\n\
                    ```css\nbody { color: red; }\n```";
        assert_eq!(names(text), vec!["index.html", "styles.css"]);
    }

    #[test]
    fn manifest_rule() {
        let text = "```json\n{\"name\":\"demo\",\"version\":\"1.0.0\",\"dependencies\":{\"react\":\"^18.0.0\"}}\n```";
        assert_eq!(names(text), vec!["package.json"]);
    }

    #[test]
    fn synthesized_names_count_only_synthesized() {
        let text = "```js\nconsole.log('one');\n```\n\
                    ```js\nfunction named() { return 1; }\n```\n\
                    ```python\nprint('two')\n```\n\
                    ```js\nconsole.log('three');\n```";
        assert_eq!(
            names(text),
            vec!["script.js", "named.js", "main2.py", "script3.js"]
        );
    }

    #[test]
    fn derived_name_collision_falls_back_to_synthesized() {
        let text = "```css\nbody { color: red; }\n```\n```css\nh1 { margin: 0; }\n```";
        assert_eq!(names(text), vec!["styles.css", "styles2.css"]);
    }

    #[test]
    fn synthesized_names_skip_hinted_names() {
        let text = "filename: script.js\n```js\nconsole.log('a');\n```\n\
                    ```js\nconsole.log('b');\n```";
        assert_eq!(names(text), vec!["script.js", "script2.js"]);
    }

    #[test]
    fn hints_are_consumed_in_text_order() {
        let text = "File: b.js\n\
                    // filename: a.js\n```js\nconsole.log('a');\n```\n\
                    ```js\nconsole.log('b');\n```";
        // the label comes first in the text, so it names the first block
        assert_eq!(names(text), vec!["b.js", "a.js"]);
    }

    #[test]
    fn hint_gives_directory() {
        let options = ParserOptions::default();
        let text = "// filename: foo/bar.js\n```js\nlet a = 1;\n```";
        let blocks = resolve_names(extract_blocks(text, &options), &options);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].filename, "bar.js");
        assert_eq!(blocks[0].path.as_str(), "foo/bar.js");
        assert_eq!(blocks[0].directories().collect::<Vec<_>>(), vec!["foo"]);
    }

    #[test]
    fn hinted_extension_sets_undeclared_language() {
        let options = ParserOptions::default();
        let text = "filename: tool.py\n```\nx = compute(1)\n```";
        let blocks = resolve_names(extract_blocks(text, &options), &options);
        assert_eq!(blocks[0].language, Language::Python);
    }

    #[test]
    fn prose_block_does_not_consume_hint() {
        let text = "filename: real.js\n\
                    ```\nPlease remember everything described above carefully, friend.\n```\n\
                    ```js\nconsole.log('x');\n```";
        assert_eq!(names(text), vec!["real.js"]);
    }

    #[test]
    fn degenerate_hint_drops_block() {
        let text = "// filename: ../<>\n```js\nconsole.log('x');\n```";
        assert!(names(text).is_empty());
    }

    #[test]
    fn unknown_language_gets_txt() {
        assert_eq!(
            names("```kotlin\nfun main() { println(\"hi\") }\n```"),
            vec!["file.txt"]
        );
    }
}
