//! JSON action envelopes.
//!
//! Assistants prompted to act on a repository often end their reply with a
//! block such as `{"actions": [{"type": "create_file", "path": ..., "content":
//! ...}]}`. File-producing actions carry their own path, so they become blocks
//! with a declared path instead of one opaque JSON file.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    actions: Vec<Action>,
}

#[derive(Debug, Deserialize)]
struct Action {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAction {
    pub path: String,
    pub content: String,
}

/// Parse `text` as an action envelope.
///
/// Returns `None` when the text is not an envelope at all, and the (possibly
/// empty) list of file actions otherwise.
pub fn parse_envelope(text: &str) -> Option<Vec<FileAction>> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') || !trimmed.contains("\"actions\"") {
        return None;
    }
    let envelope: Envelope = match serde_json::from_str(trimmed) {
        Ok(envelope) => envelope,
        Err(e) => {
            log::debug!("Ignoring malformed action envelope: {e}");
            return None;
        }
    };

    let files = envelope
        .actions
        .into_iter()
        .filter_map(|action| match action.kind.as_str() {
            "create_file" | "update_file" => match (action.path, action.content) {
                (Some(path), Some(content)) if !path.trim().is_empty() => {
                    Some(FileAction { path, content })
                }
                _ => {
                    log::debug!("Skipping {} action without path or content", action.kind);
                    None
                }
            },
            other => {
                log::debug!("Ignoring non-file action {other:?}");
                None
            }
        })
        .collect();
    Some(files)
}
