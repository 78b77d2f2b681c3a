//! Fenced-block and filename-hint extraction.
//!
//! Scans a raw model response for triple-backtick regions and for filename
//! annotations around them. Hints are reported in text order regardless of
//! their kind; the name resolver consumes them in exactly that order.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::actions;
use crate::options::ParserOptions;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([\w+#.\-]*)[^\n`]*\r?\n(.*?)```").expect("Invalid fence regex")
});

static HINT_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^(?:file[ _-]?name|file)[*_`]*\s*:[\s*`'"]*([^\s*`'"]+)"#)
        .expect("Invalid hint regex")
});

static PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:here(?:'s|’s| is| are)|below is|sure[,!.]?)[^\n]*?:[ \t]*(?:\r?\n|$)")
        .expect("Invalid preamble regex")
});

static STRAY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[\w+#.\-]*").expect("Invalid stray fence regex"));

/// Extension-less file names that are still plausible hints.
const BARE_FILE_NAMES: &[&str] = &[
    "Dockerfile",
    "Makefile",
    "Procfile",
    "Gemfile",
    "Rakefile",
    "Jenkinsfile",
    "Vagrantfile",
    "LICENSE",
    "README",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
    /// A `filename: x` / `file: x` line in the surrounding prose.
    Label,
    /// A `// filename: x` style comment next to a fence.
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameHint {
    pub path: String,
    /// Byte offset of the line the hint was found on.
    pub offset: usize,
    pub kind: HintKind,
}

/// A block as found in the text, before classification and naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub declared_language: Option<String>,
    pub raw_text: String,
    /// Hints found between the previous block and the end of this one.
    pub preceding_hints: Vec<String>,
    /// Path supplied by a JSON action envelope; takes priority over hints.
    pub declared_path: Option<String>,
    /// Byte offset of the fence opener (0 for the implicit fallback block).
    pub offset: usize,
}

impl RawBlock {
    fn new(declared_language: Option<String>, raw_text: String, offset: usize) -> Self {
        Self {
            declared_language,
            raw_text,
            preceding_hints: Vec::new(),
            declared_path: None,
            offset,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub blocks: Vec<RawBlock>,
    pub hints: Vec<FilenameHint>,
}

/// Split a response into raw blocks and filename hints.
pub fn extract_blocks(text: &str, options: &ParserOptions) -> Extraction {
    let mut extraction = Extraction::default();
    let mut accepted = Acceptor::new(options);
    let mut cursor = 0;

    for caps in FENCE.captures_iter(text) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let hints_before = extraction.hints.len();

        scan_prose(&text[cursor..whole.start()], cursor, true, &mut extraction.hints);
        if let Some(hint) = first_line_hint(body.as_str(), body.start()) {
            extraction.hints.push(hint);
        }

        let preceding: Vec<String> = extraction.hints[hints_before..]
            .iter()
            .map(|h| h.path.clone())
            .collect();
        let declared = caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());

        for mut block in expand_block(declared, body.as_str(), whole.start()) {
            block.preceding_hints = preceding.clone();
            accepted.offer(block, &mut extraction.blocks);
        }
        cursor = whole.end();
    }

    scan_prose(&text[cursor..], cursor, false, &mut extraction.hints);

    if extraction.blocks.is_empty() && !text.trim().is_empty() {
        for block in fallback_blocks(text) {
            accepted.offer(block, &mut extraction.blocks);
        }
    }

    extraction
}

/// Turn one fenced body into raw blocks, unpacking JSON action envelopes.
fn expand_block(declared: Option<String>, body: &str, offset: usize) -> Vec<RawBlock> {
    let may_be_envelope = declared
        .as_deref()
        .is_none_or(|tag| tag.eq_ignore_ascii_case("json"));
    if may_be_envelope && let Some(files) = actions::parse_envelope(body) {
        if files.is_empty() {
            log::debug!("Dropping action envelope without file actions at offset {offset}");
        }
        return files
            .into_iter()
            .map(|file| {
                let mut block = RawBlock::new(None, file.content, offset);
                block.declared_path = Some(file.path);
                block
            })
            .collect();
    }
    vec![RawBlock::new(declared, body.to_string(), offset)]
}

/// Whole-response block used when no fenced block survived the filters.
fn fallback_blocks(text: &str) -> Vec<RawBlock> {
    let without_preamble = PREAMBLE.replace(text, "");
    let cleaned = STRAY_FENCE.replace_all(&without_preamble, "");
    if let Some(files) = actions::parse_envelope(&cleaned) {
        return files
            .into_iter()
            .map(|file| {
                let mut block = RawBlock::new(None, file.content, 0);
                block.declared_path = Some(file.path);
                block
            })
            .collect();
    }
    vec![RawBlock::new(None, cleaned.trim().to_string(), 0)]
}

/// Applies the length and duplicate filters in acceptance order.
struct Acceptor<'a> {
    options: &'a ParserOptions,
    seen: HashSet<(Option<String>, Option<String>, String)>,
}

impl<'a> Acceptor<'a> {
    fn new(options: &'a ParserOptions) -> Self {
        Self {
            options,
            seen: HashSet::new(),
        }
    }

    fn offer(&mut self, block: RawBlock, out: &mut Vec<RawBlock>) {
        let trimmed = block.raw_text.trim();
        if trimmed.chars().count() < self.options.min_block_chars.max(1) {
            log::debug!("Dropping block at offset {}: too short", block.offset);
            return;
        }

        let prefix: String = trimmed
            .chars()
            .take(self.options.dedup_prefix_chars)
            .collect();
        let key = (
            block.declared_language.clone(),
            block.declared_path.clone(),
            prefix,
        );
        if !self.seen.insert(key) {
            log::debug!("Dropping block at offset {}: duplicate", block.offset);
            return;
        }
        out.push(block);
    }
}

/// Collect hints from text outside fences.
///
/// Label lines count anywhere. A comment-style hint only counts on the last
/// non-blank line right before a fence opener.
fn scan_prose(segment: &str, base: usize, fence_follows: bool, hints: &mut Vec<FilenameHint>) {
    let lines = lines_with_offsets(segment);
    let last_non_blank = lines.iter().rposition(|(_, line)| !line.trim().is_empty());

    for (idx, (offset, line)) in lines.iter().enumerate() {
        let Some((kind, path)) = parse_hint_line(line) else {
            continue;
        };
        let adjacent = fence_follows && Some(idx) == last_non_blank;
        if kind == HintKind::Label || adjacent {
            hints.push(FilenameHint {
                path,
                offset: base + offset,
                kind,
            });
        }
    }
}

/// A comment hint on the first non-blank line inside a fenced body.
fn first_line_hint(body: &str, base: usize) -> Option<FilenameHint> {
    let (offset, line) = lines_with_offsets(body)
        .into_iter()
        .find(|(_, line)| !line.trim().is_empty())?;
    match parse_hint_line(line)? {
        (HintKind::Comment, path) => Some(FilenameHint {
            path,
            offset: base + offset,
            kind: HintKind::Comment,
        }),
        (HintKind::Label, _) => None,
    }
}

fn lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n')
        .map(|line| {
            let start = offset;
            offset += line.len();
            (start, line.trim_end_matches(['\r', '\n']))
        })
        .collect()
}

/// Recognise a filename annotation on a single line.
fn parse_hint_line(line: &str) -> Option<(HintKind, String)> {
    let trimmed = line.trim();
    let (kind, rest) = strip_comment_marker(trimmed)
        .map(|rest| (HintKind::Comment, rest))
        .unwrap_or_else(|| (HintKind::Label, strip_decoration(trimmed)));

    let caps = HINT_BODY.captures(rest.trim_start())?;
    let path = caps
        .get(1)?
        .as_str()
        .trim_end_matches(['.', ',', ';', ':', ')', '/']);
    is_plausible_path(path).then(|| (kind, path.to_string()))
}

fn strip_comment_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("//") {
        return Some(rest);
    }
    if let Some(rest) = line.strip_prefix("/*") {
        return Some(rest.trim_end_matches("*/"));
    }
    if let Some(rest) = line.strip_prefix("<!--") {
        return Some(rest.trim_end_matches("-->"));
    }
    if let Some(rest) = line.strip_prefix("--") {
        return Some(rest);
    }
    // A single `#` is a shell/python comment; `##` and up is a Markdown heading.
    match line.strip_prefix('#') {
        Some(rest) if !rest.starts_with('#') => Some(rest),
        _ => None,
    }
}

fn strip_decoration(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, '#' | '-' | '*' | '+' | '>' | '`' | '_')
    })
}

fn is_plausible_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with("//") {
        return false;
    }
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    path.contains(['.', '/']) || BARE_FILE_NAMES.contains(&name)
}
