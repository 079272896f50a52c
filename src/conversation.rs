//! Chat log plus the transcript channels derived from it.
//!
//! Every recorded turn is appended to the [`ChatLog`] and then the flattened
//! transcript is republished: first to the `Database` channel, then mirrored
//! to the `Responses` channel the GUI renders.

use crate::channel::{ChannelKey, ChannelStore};
use crate::chat_log::{ChatLog, ChatTurn, Role, render_transcript};
use crate::config::IdentityConfig;
use crate::error::Result;

/// Records turns and keeps the GUI transcript current.
#[derive(Debug, Clone)]
pub struct Conversation {
    log: ChatLog,
    channels: ChannelStore,
    identity: IdentityConfig,
}

impl Conversation {
    pub fn new(log: ChatLog, channels: ChannelStore, identity: IdentityConfig) -> Self {
        Self {
            log,
            channels,
            identity,
        }
    }

    /// The underlying history store, handed to chat/search responders.
    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn identity(&self) -> &IdentityConfig {
        &self.identity
    }

    /// Append a turn and republish the transcript.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be written. A failed transcript
    /// refresh is logged only; the next refresh rewrites it whole.
    pub fn record(&self, role: Role, content: &str) -> Result<()> {
        self.log.append(ChatTurn {
            role,
            content: content.to_owned(),
        })?;
        tracing::debug!(role = role.as_str(), chars = content.len(), "turn recorded");

        if let Err(e) = self.refresh() {
            tracing::warn!(error = %e, "failed to refresh transcript channels");
        }
        Ok(())
    }

    /// Rebuild the transcript from the persisted log.
    ///
    /// # Errors
    ///
    /// Propagates channel write failures.
    pub fn refresh(&self) -> Result<()> {
        let transcript = render_transcript(&self.log.load(), &self.identity);
        self.channels.write(ChannelKey::Database, &transcript)?;

        let shown = match self.channels.read(ChannelKey::Database) {
            Some(data) if !data.is_empty() => data,
            _ => self.identity.default_greeting(),
        };
        self.channels.write(ChannelKey::Responses, &shown)
    }
}
