//! OpenAI-compatible chat completion responder.
//!
//! One non-streaming `POST {base_url}/chat/completions` per answer. The
//! message list is: system prompt, (realtime flavour) a date/time system
//! message, every user/assistant turn from the chat log, then the query.

use crate::chat_log::{ChatLog, Role};
use crate::config::{CompletionConfig, IdentityConfig};
use crate::handlers::Responder;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// End-of-sequence marker some models leak into their output.
const EOS_MARKER: &str = "</s>";

/// Which answer path this responder serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderFlavor {
    Chat,
    Realtime,
}

impl ResponderFlavor {
    fn name(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Realtime => "realtime search",
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionResponder {
    client: reqwest::Client,
    url: String,
    api_key: String,
    config: CompletionConfig,
    system_prompt: String,
    flavor: ResponderFlavor,
}

impl ChatCompletionResponder {
    pub fn new(
        config: &CompletionConfig,
        api_key: String,
        identity: &IdentityConfig,
        flavor: ResponderFlavor,
    ) -> Self {
        let base = config.base_url.trim_end_matches('/');
        Self {
            client: reqwest::Client::new(),
            url: format!("{base}/chat/completions"),
            api_key,
            config: config.clone(),
            system_prompt: system_prompt(identity, flavor),
            flavor,
        }
    }

    fn build_body(&self, query: &str, history: &ChatLog) -> serde_json::Value {
        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": self.system_prompt,
        })];
        if self.flavor == ResponderFlavor::Realtime {
            messages.push(serde_json::json!({
                "role": "system",
                "content": realtime_information(chrono::Local::now()),
            }));
        }
        for turn in history.load() {
            if turn.role == Role::System {
                continue;
            }
            messages.push(serde_json::json!({
                "role": turn.role.as_str(),
                "content": turn.content,
            }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": query }));

        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "stream": false,
        })
    }
}

#[async_trait]
impl Responder for ChatCompletionResponder {
    fn name(&self) -> &'static str {
        self.flavor.name()
    }

    async fn respond(&self, query: &str, history: &ChatLog) -> anyhow::Result<String> {
        let body = self.build_body(query, history);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("completion endpoint returned {status}: {text}");
        }

        let parsed: CompletionResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("completion response had no content"))?;

        Ok(content.replace(EOS_MARKER, "").trim().to_owned())
    }
}

fn system_prompt(identity: &IdentityConfig, flavor: ResponderFlavor) -> String {
    let u = &identity.username;
    let a = &identity.assistant_name;
    match flavor {
        ResponderFlavor::Chat => format!(
            "Hello, I am {u}, You are a very accurate and advanced AI chatbot named {a}.\n\
             *** Reply only in English and keep answers short and to the point. ***\n\
             *** Do not mention your training data or provide notes in the output. ***"
        ),
        ResponderFlavor::Realtime => format!(
            "Hello, I am {u}, You are a very accurate and advanced AI chatbot named {a} \
             which has real-time up-to-date information.\n\
             *** Provide answers in a professional way with proper punctuation and grammar. ***"
        ),
    }
}

/// Date and time block handed to the realtime flavour.
fn realtime_information<Tz>(now: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "Use This Real-time Information if needed:\n\
         Day: {}\nDate: {}\nMonth: {}\nYear: {}\n\
         Time: {} hours, {} minutes, {} seconds.\n",
        now.format("%A"),
        now.format("%d"),
        now.format("%B"),
        now.format("%Y"),
        now.format("%H"),
        now.format("%M"),
        now.format("%S"),
    )
}
