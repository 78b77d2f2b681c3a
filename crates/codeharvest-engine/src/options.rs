use serde::{Deserialize, Serialize};

/// Tuning knobs for the parser pipeline.
///
/// Constructed once (usually from the config file) and passed by reference
/// through every stage. Missing fields fall back to the defaults below when
/// deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Blocks whose trimmed body is shorter than this are discarded.
    pub min_block_chars: usize,
    /// Number of leading characters compared when deduplicating blocks.
    pub dedup_prefix_chars: usize,
    /// Resolved file names longer than this are truncated.
    pub max_filename_chars: usize,
    /// Prose needs strictly more tokens than this.
    pub prose_min_tokens: usize,
    /// Tokens strictly longer than this count as "long" for prose detection.
    pub prose_long_token_len: usize,
    /// Share of long tokens above which text is treated as prose.
    pub prose_long_token_ratio: f64,
    /// Project name used when no archetype or manifest provides one.
    pub default_project_name: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            min_block_chars: 5,
            dedup_prefix_chars: 50,
            max_filename_chars: 100,
            prose_min_tokens: 5,
            prose_long_token_len: 4,
            prose_long_token_ratio: 0.6,
            default_project_name: "generated-project".to_string(),
        }
    }
}
