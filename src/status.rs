//! Assistant activity status and microphone switch.
//!
//! Both are plain last-writer-wins broadcasts over a channel. There is no
//! transition table: any component may set any status at any time, and a
//! poller only ever sees the most recent write.

use crate::channel::{ChannelKey, ChannelStore};
use crate::error::Result;
use std::fmt;
use std::str::FromStr;

/// Labels broadcast on the status channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistantStatus {
    Listening,
    Thinking,
    Searching,
    Answering,
    Available,
}

impl AssistantStatus {
    /// The exact label written to the channel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Listening => "Listening...",
            Self::Thinking => "Thinking...",
            Self::Searching => "Searching...",
            Self::Answering => "Answering...",
            Self::Available => "Available ...",
        }
    }
}

impl fmt::Display for AssistantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a channel value is not a known status label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown assistant status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for AssistantStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        [
            Self::Listening,
            Self::Thinking,
            Self::Searching,
            Self::Answering,
            Self::Available,
        ]
        .into_iter()
        .find(|status| status.label() == trimmed)
        .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// Writer/reader for the status channel.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    channels: ChannelStore,
}

impl StatusBoard {
    pub fn new(channels: ChannelStore) -> Self {
        Self { channels }
    }

    /// Broadcast a status.
    ///
    /// # Errors
    ///
    /// Propagates channel write failures.
    pub fn set(&self, status: AssistantStatus) -> Result<()> {
        tracing::debug!(status = %status, "assistant status");
        self.channels.write(ChannelKey::Status, status.label())
    }

    /// Broadcast a status, logging instead of failing.
    ///
    /// Status is advisory; a missed write is corrected by the next one.
    pub fn announce(&self, status: AssistantStatus) {
        if let Err(e) = self.set(status) {
            tracing::warn!(status = %status, error = %e, "failed to publish status");
        }
    }

    /// Raw label currently on the channel (empty when unset).
    pub fn raw(&self) -> String {
        self.channels.read(ChannelKey::Status).unwrap_or_default()
    }

    /// Parsed current status, `None` when unset or unrecognised.
    pub fn current(&self) -> Option<AssistantStatus> {
        self.raw().parse().ok()
    }

    /// Write `Available ...` unless the channel already contains it.
    ///
    /// Returns `true` when a write happened.
    pub fn ensure_available(&self) -> bool {
        if self.raw().contains(AssistantStatus::Available.label()) {
            return false;
        }
        self.announce(AssistantStatus::Available);
        true
    }
}

/// The mic-enable flag toggled by the GUI and polled by the orchestrator.
#[derive(Debug, Clone)]
pub struct MicSwitch {
    channels: ChannelStore,
}

impl MicSwitch {
    pub fn new(channels: ChannelStore) -> Self {
        Self { channels }
    }

    /// Write `"True"` or `"False"`.
    ///
    /// # Errors
    ///
    /// Propagates channel write failures.
    pub fn set(&self, enabled: bool) -> Result<()> {
        self.channels
            .write(ChannelKey::Mic, if enabled { "True" } else { "False" })
    }

    /// `true` only when the channel reads exactly `"True"`.
    pub fn is_enabled(&self) -> bool {
        Self::parse(self.channels.read(ChannelKey::Mic).as_deref())
    }

    /// Interpret a raw mic channel value.
    pub fn parse(raw: Option<&str>) -> bool {
        raw.map(str::trim) == Some("True")
    }
}
