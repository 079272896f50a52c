//! Shared fakes and fixtures for integration tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use voxshell::chat_log::ChatLog;
use voxshell::config::IdentityConfig;
use voxshell::directive::Directive;
use voxshell::handlers::{Automation, IntentClassifier, Recognizer, Responder, SpeechOutput};
use voxshell::image::coordinator::ImageJobCoordinator;
use voxshell::image::worker::ImageGenerator;
use voxshell::{
    ChannelStore, Conversation, DecisionRouter, Handlers, Orchestrator, RouterSettings,
    StatusBoard,
};

/// Queries handed out one per cycle; errors once exhausted.
pub(crate) struct Script(Mutex<VecDeque<String>>);

impl Script {
    pub(crate) fn new(items: &[&str]) -> Self {
        Self(Mutex::new(items.iter().map(|s| (*s).to_owned()).collect()))
    }
}

#[async_trait]
impl Recognizer for Script {
    async fn recognize(&self) -> anyhow::Result<String> {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }
}

/// Classifier fed with explicit directive batches, one per query.
pub(crate) struct Batches(Mutex<VecDeque<Vec<Directive>>>);

impl Batches {
    pub(crate) fn new(batches: &[&[&str]]) -> Self {
        Self(Mutex::new(
            batches
                .iter()
                .map(|b| b.iter().copied().map(Directive::from).collect())
                .collect(),
        ))
    }
}

#[async_trait]
impl IntentClassifier for Batches {
    async fn classify(&self, _query: &str) -> anyhow::Result<Vec<Directive>> {
        Ok(self.0.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Answers `"<name>: <query>"` and remembers every query.
pub(crate) struct Echo {
    name: &'static str,
    pub(crate) queries: Mutex<Vec<String>>,
}

impl Echo {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for Echo {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn respond(&self, query: &str, _history: &ChatLog) -> anyhow::Result<String> {
        self.queries.lock().unwrap().push(query.to_owned());
        Ok(format!("{}: {query}", self.name))
    }
}

#[derive(Default)]
pub(crate) struct Batching(pub(crate) Mutex<Vec<Vec<Directive>>>);

#[async_trait]
impl Automation for Batching {
    async fn run(&self, directives: &[Directive]) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(directives.to_vec());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct Spoken(pub(crate) Mutex<Vec<String>>);

#[async_trait]
impl SpeechOutput for Spoken {
    async fn speak(&self, text: &str) -> bool {
        self.0.lock().unwrap().push(text.to_owned());
        true
    }
}

/// Writes one empty PNG per request into a directory.
pub(crate) struct DiskGenerator {
    pub(crate) dir: PathBuf,
    pub(crate) count: u32,
}

#[async_trait]
impl ImageGenerator for DiskGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for i in 1..=self.count {
            let path = voxshell::image::image_path(&self.dir, prompt, i);
            std::fs::write(&path, b"")?;
            out.push(path);
        }
        Ok(out)
    }
}

/// A temp directory with a channel store and conversation, plus handles to
/// the recording handlers.
pub(crate) struct Harness {
    pub(crate) dir: tempfile::TempDir,
    pub(crate) channels: ChannelStore,
    pub(crate) conversation: Conversation,
    pub(crate) chat: Arc<Echo>,
    pub(crate) search: Arc<Echo>,
    pub(crate) automation: Arc<Batching>,
    pub(crate) speech: Arc<Spoken>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let channels = ChannelStore::open(dir.path().join("Frontend").join("Files")).unwrap();
        let log = ChatLog::new(dir.path().join("Data").join("ChatLog.json"));
        let conversation = Conversation::new(log, channels.clone(), IdentityConfig::default());
        Self {
            dir,
            channels,
            conversation,
            chat: Arc::new(Echo::new("chat")),
            search: Arc::new(Echo::new("search")),
            automation: Arc::new(Batching::default()),
            speech: Arc::new(Spoken::default()),
        }
    }

    pub(crate) fn handlers(&self) -> Handlers {
        Handlers {
            chat: self.chat.clone(),
            search: self.search.clone(),
            automation: self.automation.clone(),
            speech: self.speech.clone(),
        }
    }

    pub(crate) fn router_with(&self, handlers: Handlers) -> DecisionRouter {
        let images = Arc::new(ImageJobCoordinator::detached(
            self.channels.clone(),
            Duration::from_millis(5),
        ));
        DecisionRouter::new(
            handlers,
            self.conversation.clone(),
            StatusBoard::new(self.channels.clone()),
            images,
            RouterSettings {
                exit_grace: Duration::from_millis(1),
                image_timeout: Duration::from_millis(100),
            },
        )
    }

    pub(crate) fn orchestrator(&self, queries: &[&str], batches: &[&[&str]]) -> Orchestrator {
        Orchestrator::new(
            self.channels.clone(),
            self.conversation.clone(),
            Arc::new(Script::new(queries)),
            Arc::new(Batches::new(batches)),
            self.router_with(self.handlers()),
            Duration::from_millis(5),
        )
    }

    pub(crate) fn spoken(&self) -> Vec<String> {
        self.speech.0.lock().unwrap().clone()
    }
}
