//! Shared test fakes for the collaborator traits.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::channel::ChannelStore;
use crate::chat_log::ChatLog;
use crate::config::IdentityConfig;
use crate::conversation::Conversation;
use crate::directive::Directive;
use crate::handlers::{Automation, Handlers, IntentClassifier, Recognizer, Responder, SpeechOutput};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Returns queued queries in order, then errors.
#[derive(Default)]
pub struct ScriptedRecognizer {
    queries: Mutex<VecDeque<String>>,
}

impl ScriptedRecognizer {
    pub fn new(queries: &[&str]) -> Self {
        Self {
            queries: Mutex::new(queries.iter().map(|q| (*q).to_owned()).collect()),
        }
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    async fn recognize(&self) -> anyhow::Result<String> {
        self.queries
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no more scripted queries"))
    }
}

/// Returns queued directive lists in order, then an empty list.
#[derive(Default)]
pub struct ScriptedClassifier {
    batches: Mutex<VecDeque<Vec<Directive>>>,
}

impl ScriptedClassifier {
    pub fn new(batches: &[&[&str]]) -> Self {
        Self {
            batches: Mutex::new(
                batches
                    .iter()
                    .map(|b| b.iter().copied().map(Directive::from).collect())
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl IntentClassifier for ScriptedClassifier {
    async fn classify(&self, _query: &str) -> anyhow::Result<Vec<Directive>> {
        Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// A responder call as observed by [`RecordingResponder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderCall {
    pub query: String,
    /// Number of turns in the history at call time.
    pub history_len: usize,
}

/// Answers with a fixed reply (or fails) and records every call.
pub struct RecordingResponder {
    name: &'static str,
    reply: String,
    fail: bool,
    pub calls: Mutex<Vec<ResponderCall>>,
}

impl RecordingResponder {
    pub fn replying(name: &'static str, reply: &str) -> Self {
        Self {
            name,
            reply: reply.to_owned(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::replying(name, "")
        }
    }

    pub fn calls(&self) -> Vec<ResponderCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn respond(&self, query: &str, history: &ChatLog) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(ResponderCall {
            query: query.to_owned(),
            history_len: history.load().len(),
        });
        if self.fail {
            anyhow::bail!("service unavailable");
        }
        Ok(self.reply.clone())
    }
}

/// Records each automation batch, optionally failing.
#[derive(Default)]
pub struct RecordingAutomation {
    pub fail: bool,
    pub batches: Mutex<Vec<Vec<Directive>>>,
}

#[async_trait]
impl Automation for RecordingAutomation {
    async fn run(&self, directives: &[Directive]) -> anyhow::Result<()> {
        self.batches.lock().unwrap().push(directives.to_vec());
        if self.fail {
            anyhow::bail!("automation crashed");
        }
        Ok(())
    }
}

/// Records spoken text.
#[derive(Default)]
pub struct RecordingSpeech {
    pub spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechOutput for RecordingSpeech {
    async fn speak(&self, text: &str) -> bool {
        self.spoken.lock().unwrap().push(text.to_owned());
        true
    }
}

/// A temp-dir backed channel store and conversation plus recording handlers.
pub struct Fixture {
    _dir: tempfile::TempDir,
    pub channels: ChannelStore,
    pub conversation: Conversation,
    pub chat: Arc<RecordingResponder>,
    pub search: Arc<RecordingResponder>,
    pub automation: Arc<RecordingAutomation>,
    pub speech: Arc<RecordingSpeech>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_parts(
            RecordingResponder::replying("chat", "chat answer"),
            RecordingResponder::replying("search", "search answer"),
            RecordingAutomation::default(),
        )
    }

    pub fn with_parts(
        chat: RecordingResponder,
        search: RecordingResponder,
        automation: RecordingAutomation,
    ) -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let channels = ChannelStore::open(dir.path().join("files")).unwrap();
        let log = ChatLog::new(dir.path().join("data").join("ChatLog.json"));
        let conversation = Conversation::new(log, channels.clone(), IdentityConfig::default());
        Self {
            _dir: dir,
            channels,
            conversation,
            chat: Arc::new(chat),
            search: Arc::new(search),
            automation: Arc::new(automation),
            speech: Arc::new(RecordingSpeech::default()),
        }
    }

    pub fn handlers(&self) -> Handlers {
        Handlers {
            chat: self.chat.clone(),
            search: self.search.clone(),
            automation: self.automation.clone(),
            speech: self.speech.clone(),
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.speech.spoken.lock().unwrap().clone()
    }
}
