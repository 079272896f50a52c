//! Read side of the channel protocol, as consumed by a GUI render loop.
//!
//! The GUI never writes conversation state. Its single write is the mic
//! toggle; everything else is polled and rendered.

use crate::channel::{ChannelKey, ChannelStore};
use crate::error::Result;
use crate::image::decode_listing;
use crate::status::{AssistantStatus, MicSwitch};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Most images shown at once.
pub const MAX_DISPLAYED_IMAGES: usize = 4;

/// One render frame's worth of shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuiSnapshot {
    /// Rendered transcript from the responses channel.
    pub transcript: String,
    /// Raw status label.
    pub status: String,
    pub mic_enabled: bool,
    /// Generated images that exist on disk, at most [`MAX_DISPLAYED_IMAGES`].
    pub images: Vec<PathBuf>,
}

impl GuiSnapshot {
    /// Status label parsed, when it is one of the known labels.
    pub fn parsed_status(&self) -> Option<AssistantStatus> {
        self.status.parse().ok()
    }
}

/// Reader handed to the GUI.
#[derive(Debug, Clone)]
pub struct GuiFeed {
    channels: ChannelStore,
    mic: MicSwitch,
}

impl GuiFeed {
    pub fn new(channels: ChannelStore) -> Self {
        Self {
            mic: MicSwitch::new(channels.clone()),
            channels,
        }
    }

    /// Read every GUI-relevant channel once.
    pub fn snapshot(&self) -> GuiSnapshot {
        GuiSnapshot {
            transcript: self.channels.read(ChannelKey::Responses).unwrap_or_default(),
            status: self.channels.read(ChannelKey::Status).unwrap_or_default(),
            mic_enabled: self.mic.is_enabled(),
            images: self.image_paths(),
        }
    }

    /// Toggle the microphone flag.
    ///
    /// # Errors
    ///
    /// Propagates channel write failures.
    pub fn set_mic(&self, enabled: bool) -> Result<()> {
        self.mic.set(enabled)
    }

    /// Listed images that still exist on disk, capped.
    pub fn image_paths(&self) -> Vec<PathBuf> {
        let Some(raw) = self.channels.read(ChannelKey::GeneratedImages) else {
            return Vec::new();
        };
        decode_listing(&raw)
            .into_iter()
            .filter(|path| path.exists())
            .take(MAX_DISPLAYED_IMAGES)
            .collect()
    }

    /// Publish a fresh snapshot every `interval` until `cancel` fires.
    ///
    /// Receivers are only woken when the snapshot actually changes.
    pub fn spawn_snapshots(
        &self,
        interval: Duration,
        cancel: CancellationToken,
    ) -> watch::Receiver<GuiSnapshot> {
        let (tx, rx) = watch::channel(self.snapshot());
        let feed = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(interval) => {}
                }
                let next = feed.snapshot();
                tx.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
                if tx.is_closed() {
                    break;
                }
            }
        });
        rx
    }
}
