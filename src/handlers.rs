//! Collaborator contracts consumed by the coordination layer.
//!
//! Speech recognition, intent classification, answer generation, desktop
//! automation and speech output are external services. Each is reached
//! through one narrow trait so the orchestrator can be driven by real
//! backends or by scripted fakes.

use crate::chat_log::ChatLog;
use crate::directive::Directive;
use async_trait::async_trait;
use std::sync::Arc;

/// Produces one query per active cycle.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Block until the user has said (or typed) something.
    async fn recognize(&self) -> anyhow::Result<String>;
}

/// Turns a query into the ordered directive list the router interprets.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, query: &str) -> anyhow::Result<Vec<Directive>>;
}

/// Chat or realtime-search answer generator.
///
/// `history` is the shared conversation store; the current user turn has
/// already been recorded in it when `respond` is called.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Short name used in logs and error-shaped answers.
    fn name(&self) -> &'static str;

    async fn respond(&self, query: &str, history: &ChatLog) -> anyhow::Result<String>;
}

/// Executes every automation directive of a query in one batch.
#[async_trait]
pub trait Automation: Send + Sync {
    /// Receives the full directive list, not only the automation entries.
    async fn run(&self, directives: &[Directive]) -> anyhow::Result<()>;
}

/// Speaks an answer aloud.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    /// Returns `false` if playback failed or was interrupted.
    async fn speak(&self, text: &str) -> bool;
}

/// The handler set the router dispatches to.
#[derive(Clone)]
pub struct Handlers {
    pub chat: Arc<dyn Responder>,
    pub search: Arc<dyn Responder>,
    pub automation: Arc<dyn Automation>,
    pub speech: Arc<dyn SpeechOutput>,
}
