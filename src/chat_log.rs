//! Durable, ordered conversation history.
//!
//! The log is a JSON array of `{role, content}` records. It is the single
//! source of truth for history and may be written by more than one process,
//! so every append reloads the file first and then overwrites it whole.
//! Two processes appending at the same instant can still lose one update;
//! usage is single-user and mostly sequential.

use crate::config::IdentityConfig;
use crate::error::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Written by some completion backends; never rendered.
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// One immutable turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Handle on the persisted chat log file.
#[derive(Debug, Clone)]
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    /// Create a handle for the log at `path`. Nothing is read or written.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the backing file exists and holds a JSON array.
    ///
    /// A missing, blank, or `[]` file is (re)written as `[]`. A file with
    /// turns is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::ChatLog`] if the file cannot be written.
    pub fn ensure_initialized(&self) -> Result<()> {
        let needs_reset = match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let trimmed = content.trim();
                trimmed.is_empty() || trimmed == "[]"
            }
            Err(_) => true,
        };
        if needs_reset {
            self.write_all(&[])?;
        }
        Ok(())
    }

    /// Load every turn in order.
    ///
    /// A missing, empty, or unparseable file yields an empty history.
    pub fn load(&self) -> Vec<ChatTurn> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };
        if content.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str(&content) {
            Ok(turns) => turns,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "chat log is not valid JSON; treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Append one turn, reloading the persisted log first.
    ///
    /// Returns the full history after the append.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::ChatLog`] if the log cannot be written.
    pub fn append(&self, turn: ChatTurn) -> Result<Vec<ChatTurn>> {
        let mut turns = self.load();
        turns.push(turn);
        self.write_all(&turns)?;
        Ok(turns)
    }

    /// Overwrite the whole log (temp file then rename).
    fn write_all(&self, turns: &[ChatTurn]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ShellError::ChatLog(format!(
                    "cannot create chat log directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(turns)
            .map_err(|e| ShellError::ChatLog(format!("cannot serialize chat log: {e}")))?;

        let tmp_path = self.path.with_extension(format!("json.{}.tmp", std::process::id()));
        std::fs::write(&tmp_path, json).map_err(|e| {
            ShellError::ChatLog(format!("cannot write {}: {e}", tmp_path.display()))
        })?;
        if let Ok(file) = std::fs::File::open(&tmp_path) {
            let _ = file.sync_all();
        }
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            ShellError::ChatLog(format!("cannot replace {}: {e}", self.path.display()))
        })?;
        Ok(())
    }
}

/// Flatten turns into the `"<name> : <content>"` transcript shown by the GUI.
///
/// System turns are skipped. An empty history renders the default greeting.
pub fn render_transcript(turns: &[ChatTurn], identity: &IdentityConfig) -> String {
    let lines: Vec<String> = turns
        .iter()
        .filter_map(|turn| match turn.role {
            Role::User => Some(format!("{} : {}", identity.username, turn.content)),
            Role::Assistant => Some(format!("{} : {}", identity.assistant_name, turn.content)),
            Role::System => None,
        })
        .collect();

    if lines.is_empty() {
        return identity.default_greeting();
    }
    lines.join("\n").trim().to_owned()
}
