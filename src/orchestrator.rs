//! The long-running voice-command loop.
//!
//! ```text
//!   Idle (mic "False") ──mic "True"──▶ Active: one full query cycle
//!        ▲                                   │
//!        └───────────── cycle returns ───────┘
//! ```
//!
//! The loop is not re-entrant: a new trigger during a cycle is only noticed
//! after the cycle returns. While the mic stays enabled, cycles run back to
//! back. While idle, the loop re-asserts `Available ...` when needed and
//! waits for the mic channel to change.

use crate::channel::watch::ChannelWatcher;
use crate::channel::{ChannelKey, ChannelStore};
use crate::chat_log::Role;
use crate::conversation::Conversation;
use crate::error::{Result, ShellError};
use crate::handlers::{IntentClassifier, Recognizer};
use crate::router::{DecisionRouter, RouteOutcome};
use crate::status::{AssistantStatus, MicSwitch, StatusBoard};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The cancellation token fired.
    Cancelled,
    /// An `exit` directive completed its farewell.
    ExitRequested,
}

/// Result of one query cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The recognizer produced no text.
    Skipped,
    /// The query was routed.
    Routed(RouteOutcome),
}

/// Polls the mic channel and runs query cycles.
pub struct Orchestrator {
    channels: ChannelStore,
    mic: MicSwitch,
    status: StatusBoard,
    conversation: Conversation,
    recognizer: Arc<dyn Recognizer>,
    classifier: Arc<dyn IntentClassifier>,
    router: DecisionRouter,
    poll_interval: Duration,
}

impl Orchestrator {
    pub fn new(
        channels: ChannelStore,
        conversation: Conversation,
        recognizer: Arc<dyn Recognizer>,
        classifier: Arc<dyn IntentClassifier>,
        router: DecisionRouter,
        poll_interval: Duration,
    ) -> Self {
        Self {
            mic: MicSwitch::new(channels.clone()),
            status: StatusBoard::new(channels.clone()),
            channels,
            conversation,
            recognizer,
            classifier,
            router,
            poll_interval,
        }
    }

    /// Put the shared state into its startup shape.
    ///
    /// Mic off, chat log present, transcript rendered, status available.
    ///
    /// # Errors
    ///
    /// Returns an error if any channel or the chat log cannot be written.
    pub fn bootstrap(&self) -> Result<()> {
        self.mic.set(false)?;
        self.conversation.log().ensure_initialized()?;
        self.conversation.refresh()?;
        self.status.set(AssistantStatus::Available)?;
        tracing::info!(
            channels = %self.channels.dir().display(),
            chat_log = %self.conversation.log().path().display(),
            "orchestrator ready"
        );
        Ok(())
    }

    /// Run one recognize → record → classify → route cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Handler`] for recognizer/classifier failures and
    /// propagates router errors (notably automation failures).
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        self.status.announce(AssistantStatus::Listening);
        let query = self
            .recognizer
            .recognize()
            .await
            .map_err(|e| ShellError::Handler(format!("speech recognition failed: {e:#}")))?;
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("empty recognition result; skipping cycle");
            return Ok(CycleOutcome::Skipped);
        }
        tracing::info!(query, "query received");

        if let Err(e) = self.conversation.record(Role::User, query) {
            tracing::warn!(error = %e, "failed to record user turn; continuing");
        }

        self.status.announce(AssistantStatus::Thinking);
        let directives = self
            .classifier
            .classify(query)
            .await
            .map_err(|e| ShellError::Handler(format!("intent classification failed: {e:#}")))?;
        tracing::info!(?directives, "decision");

        let outcome = self.router.route(&directives).await?;
        Ok(CycleOutcome::Routed(outcome))
    }

    /// Run until cancelled or an exit directive completes.
    ///
    /// Cycle failures are logged and the loop continues.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` leaves room for fatal conditions.
    pub async fn run(&self, cancel: CancellationToken) -> Result<LoopExit> {
        let watcher = ChannelWatcher::spawn(
            self.channels.clone(),
            ChannelKey::Mic,
            self.poll_interval,
            cancel.child_token(),
        );
        let mut mic_rx = watcher.subscribe();

        loop {
            if cancel.is_cancelled() {
                return Ok(LoopExit::Cancelled);
            }

            if self.mic.is_enabled() {
                match self.run_cycle().await {
                    Ok(CycleOutcome::Routed(RouteOutcome::Exit { .. })) => {
                        tracing::info!("exit requested; stopping orchestrator");
                        return Ok(LoopExit::ExitRequested);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "query cycle failed; continuing");
                        tokio::time::sleep(self.poll_interval).await;
                    }
                }
                continue;
            }

            self.status.ensure_available();
            tokio::select! {
                () = cancel.cancelled() => return Ok(LoopExit::Cancelled),
                _ = mic_rx.changed() => {}
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}
