//! File-backed conversation persistence.
//!
//! The whole [`ConversationState`] is rewritten after every mutation, via a
//! temp file + rename so a crash mid-write never leaves a torn session file.
//! A single active writer is assumed; there is no file locking.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::models::{ChatMessage, ConversationState, Role};

/// Handle to one session's backing file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state. A missing file yields an empty state; a
    /// corrupt file is logged and treated as empty rather than blocking
    /// startup.
    pub fn load(&self) -> ConversationState {
        if !self.path.exists() {
            return ConversationState::default();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!(
                        "Session file {} is corrupt ({e}), starting empty",
                        self.path.display()
                    );
                    ConversationState::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Could not read session file {} ({e}), starting empty",
                    self.path.display()
                );
                ConversationState::default()
            }
        }
    }

    /// Persist the state wholesale (atomic write via temp file + rename).
    pub fn save(&self, state: &ConversationState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(state)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &data)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Append a message and persist.
pub fn append_message(
    store: &SessionStore,
    state: &mut ConversationState,
    role: Role,
    content: String,
) -> Result<()> {
    state.messages.push(ChatMessage { role, content });
    store.save(state)
}

/// Pin the assistant message at `index`. Pinned responses are retained
/// separately from the transcript and survive a clear.
pub fn pin_message(
    store: &SessionStore,
    state: &mut ConversationState,
    index: usize,
) -> Result<()> {
    let msg = state
        .messages
        .get(index)
        .context("Message index out of range")?;
    anyhow::ensure!(
        msg.role == Role::Assistant,
        "Only assistant messages can be pinned"
    );
    let content = msg.content.clone();
    state.pinned_messages.push(content);
    store.save(state)
}

/// Clear the transcript (pins survive) and persist.
pub fn clear_messages(store: &SessionStore, state: &mut ConversationState) -> Result<()> {
    state.messages.clear();
    store.save(state)
}
