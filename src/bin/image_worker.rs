//! Out-of-process image generation worker.
//!
//! Watches the image-job channel, generates images for ready jobs through
//! the hosted inference router and publishes the resulting listing.

use tokio_util::sync::CancellationToken;
use voxshell::config::require_credential;
use voxshell::image::huggingface::HuggingFaceGenerator;
use voxshell::image::worker::ImageWorker;
use voxshell::{ChannelStore, ShellConfig, shell_dirs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = voxshell::logging::init(&shell_dirs::logs_dir(), "voxshell-image-worker");

    let config = ShellConfig::load_or_default()?;
    let api_key = require_credential(&config.image.api_key_env).map_err(|e| {
        tracing::error!(error = %e, "cannot start without inference credentials");
        anyhow::anyhow!("{e}")
    })?;

    let channels = ChannelStore::open(config.paths.files_dir.clone())?;
    let generator =
        HuggingFaceGenerator::new(&config.image, api_key, config.paths.data_dir.clone());
    let worker = ImageWorker::new(channels, generator, config.polling.image_interval());

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    worker.run(cancel).await;
    Ok(())
}
