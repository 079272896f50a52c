//! Hosted text-to-image inference over HTTP.

use super::image_path;
use super::worker::ImageGenerator;
use crate::config::ImageConfig;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Per-request timeout; cold models can take minutes to load.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Generates images through a Hugging Face style inference router.
pub struct HuggingFaceGenerator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    output_dir: PathBuf,
    count: u32,
    width: u32,
    height: u32,
    steps: u32,
}

impl HuggingFaceGenerator {
    /// Build a generator writing into `output_dir`.
    pub fn new(config: &ImageConfig, api_key: String, output_dir: PathBuf) -> Self {
        let endpoint = config.endpoint.trim_end_matches('/');
        Self {
            client: reqwest::Client::new(),
            url: format!("{endpoint}/{}", config.model),
            api_key,
            output_dir,
            count: config.count.max(1),
            width: config.width,
            height: config.height,
            steps: config.steps,
        }
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "width": self.width,
                "height": self.height,
                "num_inference_steps": self.steps,
            },
            "options": { "wait_for_model": true },
        })
    }

    async fn request_one(&self, prompt: &str) -> anyhow::Result<Vec<u8>> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("inference router returned {status}: {body}");
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut saved = Vec::new();
        for index in 1..=self.count {
            let out_path = image_path(&self.output_dir, prompt, index);
            match self.request_one(prompt).await {
                Ok(bytes) => {
                    tokio::fs::write(&out_path, &bytes).await?;
                    tracing::debug!(path = %out_path.display(), bytes = bytes.len(), "image saved");
                    saved.push(out_path);
                }
                Err(e) => {
                    tracing::warn!(
                        index,
                        count = self.count,
                        error = %format!("{e:#}"),
                        "image request failed"
                    );
                }
            }
        }

        if saved.is_empty() {
            anyhow::bail!("no images were generated for {prompt:?}");
        }
        Ok(saved)
    }
}
