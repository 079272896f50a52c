//! Change notification on top of polled channels.
//!
//! Processes sharing a channel have no common event loop, so the file must
//! still be polled. [`ChannelWatcher`] hides the polling behind a
//! [`tokio::sync::watch`] receiver: subscribers see the latest value and are
//! woken only when it changes.

use super::{ChannelKey, ChannelStore};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A background poller publishing one channel's value.
pub struct ChannelWatcher {
    rx: watch::Receiver<Option<String>>,
    task: JoinHandle<()>,
}

impl ChannelWatcher {
    /// Start polling `key` every `interval` until `cancel` fires.
    ///
    /// The first read happens before this returns, so the receiver starts
    /// with the current value.
    pub fn spawn(
        store: ChannelStore,
        key: ChannelKey,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = watch::channel(store.read(key));

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(interval) => {}
                }

                let latest = store.read(key);
                tx.send_if_modified(|current| {
                    if *current == latest {
                        false
                    } else {
                        tracing::trace!(channel = %key, "channel value changed");
                        *current = latest;
                        true
                    }
                });

                if tx.is_closed() {
                    break;
                }
            }
            tracing::debug!(channel = %key, "channel watcher stopped");
        });

        Self { rx, task }
    }

    /// A new receiver for the watched value.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.rx.clone()
    }

    /// The most recently observed value.
    pub fn current(&self) -> Option<String> {
        self.rx.borrow().clone()
    }
}

impl Drop for ChannelWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
