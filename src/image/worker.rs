//! Worker side of the image job hand-off.
//!
//! Runs in its own process (`voxshell-image-worker`). It polls the image-job
//! channel, generates images for a ready job, publishes the listing for the
//! GUI and resets the job with its prompt preserved.

use super::{ImageJob, encode_listing};
use crate::channel::{ChannelKey, ChannelStore};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Backend that turns a prompt into image files.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate images and return the paths written.
    async fn generate(&self, prompt: &str) -> anyhow::Result<Vec<PathBuf>>;
}

/// What one poll of the channel did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerTick {
    /// The channel was absent and has been seeded with an idle job.
    Seeded,
    /// The channel value could not be parsed.
    Malformed,
    /// No job is ready.
    Idle,
    /// A ready job had an empty prompt; it was reset without generating.
    SkippedEmpty,
    /// A job was processed. `images` is empty when generation failed.
    Processed { prompt: String, images: Vec<PathBuf> },
}

/// Polls the image-job channel and drives an [`ImageGenerator`].
pub struct ImageWorker<G> {
    channels: ChannelStore,
    generator: G,
    poll_interval: Duration,
}

impl<G: ImageGenerator> ImageWorker<G> {
    pub fn new(channels: ChannelStore, generator: G, poll_interval: Duration) -> Self {
        Self {
            channels,
            generator,
            poll_interval,
        }
    }

    /// Poll until `cancel` fires.
    ///
    /// Failures inside a tick are logged and the loop keeps going.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            channel = %self.channels.path(ChannelKey::ImageJob).display(),
            "image worker monitoring"
        );
        loop {
            match self.tick().await {
                Ok(WorkerTick::Processed { prompt, images }) => {
                    tracing::info!(prompt = %prompt, images = images.len(), "image job done");
                }
                Ok(tick) => tracing::trace!(?tick, "image worker tick"),
                Err(e) => tracing::error!(error = %e, "image worker tick failed"),
            }

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }
        tracing::info!("image worker stopped");
    }

    /// Inspect the channel once and act on it.
    ///
    /// # Errors
    ///
    /// Returns an error only when a channel write fails.
    pub async fn tick(&self) -> Result<WorkerTick> {
        let Some(raw) = self.channels.read(ChannelKey::ImageJob) else {
            self.channels.write(
                ChannelKey::ImageJob,
                &ImageJob {
                    prompt: " ".to_owned(),
                    ready: false,
                }
                .encode(),
            )?;
            return Ok(WorkerTick::Seeded);
        };

        let Some(job) = ImageJob::decode(&raw) else {
            tracing::warn!(raw = %raw, "image job format incorrect; expected 'prompt;True'");
            return Ok(WorkerTick::Malformed);
        };

        if !job.ready {
            return Ok(WorkerTick::Idle);
        }

        if job.prompt.is_empty() {
            tracing::warn!("image job has an empty prompt; skipping");
            self.channels
                .write(ChannelKey::ImageJob, &job.completed().encode())?;
            return Ok(WorkerTick::SkippedEmpty);
        }

        tracing::info!(prompt = %job.prompt, "generating images");
        let images = match self.generator.generate(&job.prompt).await {
            Ok(paths) => {
                self.channels.write(
                    ChannelKey::GeneratedImages,
                    &encode_listing(&job.prompt, &paths),
                )?;
                paths
            }
            Err(e) => {
                tracing::error!(prompt = %job.prompt, error = %format!("{e:#}"), "image generation failed");
                Vec::new()
            }
        };

        self.channels
            .write(ChannelKey::ImageJob, &job.completed().encode())?;

        Ok(WorkerTick::Processed {
            prompt: job.prompt,
            images,
        })
    }
}
