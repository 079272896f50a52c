//! Configuration types for the assistant shell.

use crate::error::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration for the orchestrator and the image worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Display names used in the transcript.
    pub identity: IdentityConfig,
    /// Channel and history locations.
    pub paths: PathsConfig,
    /// Poll cadences for the file-backed channels.
    pub polling: PollingConfig,
    /// Delay after the farewell answer before the loop exits, in ms.
    ///
    /// Gives speech playback time to finish.
    pub exit_grace_ms: u64,
    /// Image worker and inference settings.
    pub image: ImageConfig,
    /// Chat/search completion endpoint settings.
    pub completion: CompletionConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            identity: IdentityConfig::default(),
            paths: PathsConfig::default(),
            polling: PollingConfig::default(),
            exit_grace_ms: 2000,
            image: ImageConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

/// Names shown for each side of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub username: String,
    pub assistant_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            username: "User".to_owned(),
            assistant_name: "Assistant".to_owned(),
        }
    }
}

impl IdentityConfig {
    /// Transcript shown when the chat log holds no turns yet.
    pub fn default_greeting(&self) -> String {
        let u = &self.username;
        let a = &self.assistant_name;
        format!(
            "{u} : Hello {a}, How are you?\n{a} : Welcome {u}. I am doing well. How may I help you?"
        )
    }
}

/// Filesystem locations shared between processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding one file per channel key.
    pub files_dir: PathBuf,
    /// Directory holding `ChatLog.json` and generated images.
    pub data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            files_dir: crate::shell_dirs::files_dir(),
            data_dir: crate::shell_dirs::history_dir(),
        }
    }
}

impl PathsConfig {
    /// Path of the persisted chat history.
    pub fn chat_log_file(&self) -> PathBuf {
        self.data_dir.join("ChatLog.json")
    }
}

/// Poll intervals, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub mic_poll_ms: u64,
    pub gui_poll_ms: u64,
    pub image_poll_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            mic_poll_ms: 100,
            gui_poll_ms: 100,
            image_poll_ms: 1000,
        }
    }
}

impl PollingConfig {
    pub fn mic_interval(&self) -> Duration {
        Duration::from_millis(self.mic_poll_ms.max(1))
    }

    pub fn gui_interval(&self) -> Duration {
        Duration::from_millis(self.gui_poll_ms.max(1))
    }

    pub fn image_interval(&self) -> Duration {
        Duration::from_millis(self.image_poll_ms.max(1))
    }
}

/// Image generation worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Program launched as the out-of-process worker.
    pub program: PathBuf,
    /// Arguments passed to the worker program.
    pub args: Vec<String>,
    /// Inference model identifier appended to `endpoint`.
    pub model: String,
    /// Base URL of the hosted inference router.
    pub endpoint: String,
    /// Images generated per prompt.
    pub count: u32,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    /// Environment variable holding the inference API key.
    pub api_key_env: String,
    /// Upper bound when waiting on a submitted job.
    pub completion_timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("voxshell-image-worker"),
            args: Vec::new(),
            model: "stabilityai/stable-diffusion-xl-base-1.0".to_owned(),
            endpoint: "https://router.huggingface.co/hf-inference/models".to_owned(),
            count: 4,
            width: 1024,
            height: 1024,
            steps: 28,
            api_key_env: "HUGGINGFACE_API_KEY".to_owned(),
            completion_timeout_secs: 300,
        }
    }
}

/// OpenAI-compatible chat completion endpoint used by the chat and search
/// responders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL including the version segment (e.g. `https://api.groq.com/openai/v1`).
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_owned(),
            model: "llama-3.1-8b-instant".to_owned(),
            api_key_env: "GROQ_API_KEY".to_owned(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

impl ShellConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ShellError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ShellError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path (`config_dir()/config.toml`).
    pub fn default_config_path() -> PathBuf {
        crate::shell_dirs::config_file()
    }

    /// Load from the default path, or defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error only when a config file exists but is unreadable.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_config_path();
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Read a required credential from the environment.
///
/// # Errors
///
/// Returns [`ShellError::Config`] when the variable is unset or blank.
pub fn require_credential(env_name: &str) -> Result<String> {
    match std::env::var(env_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ShellError::Config(format!(
            "missing required credential: set {env_name}"
        ))),
    }
}
