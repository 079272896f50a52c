//! Terminal stand-ins for the microphone and the speaker.

use crate::handlers::{Recognizer, SpeechOutput};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Query returned once stdin is closed, so the loop can say goodbye.
pub const END_OF_INPUT_QUERY: &str = "exit";

/// Reads one typed line per cycle from stdin.
pub struct ConsoleRecognizer {
    lines: Mutex<Lines<BufReader<Stdin>>>,
    prompt: String,
}

impl ConsoleRecognizer {
    pub fn new(username: &str) -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            prompt: format!("{username} > "),
        }
    }
}

#[async_trait]
impl Recognizer for ConsoleRecognizer {
    async fn recognize(&self) -> anyhow::Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(self.prompt.as_bytes()).await?;
        stdout.flush().await?;

        let mut lines = self.lines.lock().await;
        match lines.next_line().await? {
            Some(line) => Ok(line),
            None => {
                tracing::info!("stdin closed; requesting exit");
                Ok(END_OF_INPUT_QUERY.to_owned())
            }
        }
    }
}

/// Prints answers instead of speaking them.
pub struct ConsoleSpeech {
    assistant_name: String,
}

impl ConsoleSpeech {
    pub fn new(assistant_name: &str) -> Self {
        Self {
            assistant_name: assistant_name.to_owned(),
        }
    }

    fn render(&self, text: &str) -> String {
        format!("{} : {text}\n", self.assistant_name)
    }
}

#[async_trait]
impl SpeechOutput for ConsoleSpeech {
    async fn speak(&self, text: &str) -> bool {
        let mut stdout = tokio::io::stdout();
        let written = stdout.write_all(self.render(text).as_bytes()).await;
        match written.and(stdout.flush().await) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to print answer");
                false
            }
        }
    }
}
