//! Decision router: turns classifier directives into handler dispatches.
//!
//! For one query the router performs, in order:
//!
//! 1. at most one automation dispatch (whole directive list, one batch),
//! 2. at most one image job submission,
//! 3. exactly one answer path: realtime search, general chat, exit, or none.
//!
//! Every answer is appended to the conversation, the transcript channels are
//! refreshed, the status moves through Thinking/Searching to Answering, and
//! the answer is handed to speech output. The user turn is recorded by the
//! query cycle before routing starts.

pub mod plan;

pub use plan::{AnswerPath, RoutePlan};

use crate::chat_log::Role;
use crate::conversation::Conversation;
use crate::directive::Directive;
use crate::error::{Result, ShellError};
use crate::handlers::{Handlers, Responder};
use crate::image::coordinator::{ImageJobCoordinator, JobState};
use crate::status::{AssistantStatus, StatusBoard};
use crate::text::{normalize_query, tidy_answer};
use std::sync::Arc;
use std::time::Duration;

/// Query sent to the chat handler to produce the farewell.
pub const FAREWELL_PROMPT: &str = "Okay, Bye!";

/// Result of routing one directive list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// An answer was produced, logged and spoken.
    Answered { answer: String },
    /// Nothing needed answering.
    Silent,
    /// The farewell was delivered; the caller should stop.
    Exit { farewell: String },
}

/// Timing knobs for the router.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    /// Pause after the farewell so playback can finish.
    pub exit_grace: Duration,
    /// Bound on how long a background task tracks an image job.
    pub image_timeout: Duration,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            exit_grace: Duration::from_secs(2),
            image_timeout: Duration::from_secs(300),
        }
    }
}

/// Dispatches directive lists to the handler set.
pub struct DecisionRouter {
    handlers: Handlers,
    conversation: Conversation,
    status: StatusBoard,
    images: Arc<ImageJobCoordinator>,
    settings: RouterSettings,
}

impl DecisionRouter {
    pub fn new(
        handlers: Handlers,
        conversation: Conversation,
        status: StatusBoard,
        images: Arc<ImageJobCoordinator>,
        settings: RouterSettings,
    ) -> Self {
        Self {
            handlers,
            conversation,
            status,
            images,
            settings,
        }
    }

    /// Route one query's directives.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Automation`] when the automation handler fails;
    /// image and answer steps are skipped in that case. Chat and search
    /// failures are not errors: they become an error-shaped answer.
    pub async fn route(&self, directives: &[Directive]) -> Result<RouteOutcome> {
        let plan = RoutePlan::from_directives(directives);
        tracing::info!(
            directives = directives.len(),
            automation = plan.automation,
            image = plan.image_prompt.is_some(),
            answer = ?plan.answer,
            "routing decision"
        );

        if plan.automation {
            self.handlers
                .automation
                .run(directives)
                .await
                .map_err(|e| ShellError::Automation(format!("{e:#}")))?;
        }

        if let Some(prompt) = &plan.image_prompt {
            self.submit_image(prompt);
        }

        match plan.answer {
            AnswerPath::Realtime { query } => {
                let answer = self
                    .answer(self.handlers.search.as_ref(), AssistantStatus::Searching, &query)
                    .await?;
                Ok(RouteOutcome::Answered { answer })
            }
            AnswerPath::General { query } => {
                let answer = self
                    .answer(self.handlers.chat.as_ref(), AssistantStatus::Thinking, &query)
                    .await?;
                Ok(RouteOutcome::Answered { answer })
            }
            AnswerPath::Exit => {
                let farewell = self
                    .answer(
                        self.handlers.chat.as_ref(),
                        AssistantStatus::Thinking,
                        FAREWELL_PROMPT,
                    )
                    .await?;
                tokio::time::sleep(self.settings.exit_grace).await;
                Ok(RouteOutcome::Exit { farewell })
            }
            AnswerPath::Silent => Ok(RouteOutcome::Silent),
        }
    }

    /// Produce, record and speak one answer.
    async fn answer(
        &self,
        responder: &dyn Responder,
        working: AssistantStatus,
        query: &str,
    ) -> Result<String> {
        self.status.announce(working);

        let query = normalize_query(query);
        let answer = match responder.respond(&query, self.conversation.log()).await {
            Ok(text) => tidy_answer(&text),
            Err(e) => {
                tracing::warn!(handler = responder.name(), error = %format!("{e:#}"), "handler failed");
                format!("[Error from {}: {e}]", responder.name())
            }
        };

        if let Err(e) = self.conversation.record(Role::Assistant, &answer) {
            tracing::warn!(error = %e, "failed to record answer; speaking it anyway");
        }
        self.status.announce(AssistantStatus::Answering);

        if !self.handlers.speech.speak(&answer).await {
            tracing::debug!("speech output did not complete");
        }
        Ok(answer)
    }

    /// Hand the prompt to the image worker without waiting.
    fn submit_image(&self, prompt: &str) {
        let handle = match self.images.submit(prompt) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(prompt, error = %e, "skipping image generation this cycle");
                return;
            }
        };

        let timeout = self.settings.image_timeout;
        tokio::spawn(async move {
            match handle.wait_for_completion(timeout).await {
                Ok(JobState::Completed) => {
                    tracing::info!(prompt = handle.prompt(), "image job completed");
                }
                Ok(state) => {
                    tracing::debug!(prompt = handle.prompt(), ?state, "image job no longer tracked");
                }
                Err(e) => tracing::warn!(error = %e, "image job not observed to finish"),
            }
        });
    }
}
