//! Console host for the assistant loop.
//!
//! Typed lines stand in for recognized speech and answers are printed to
//! stdout. Diagnostics go to stderr and the daily log file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use voxshell::config::require_credential;
use voxshell::external::{
    ChatCompletionResponder, ConsoleRecognizer, ConsoleSpeech, LoggingAutomation,
    PrefixClassifier, ResponderFlavor,
};
use voxshell::image::coordinator::{ImageJobCoordinator, WorkerCommand};
use voxshell::{
    ChannelStore, ChatLog, Conversation, DecisionRouter, Handlers, LoopExit, MicSwitch,
    Orchestrator, RouterSettings, ShellConfig, StatusBoard, shell_dirs,
};

/// Name of the worker binary built alongside this one.
const WORKER_BIN: &str = "voxshell-image-worker";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = voxshell::logging::init(&shell_dirs::logs_dir(), "voxshell");

    let config = ShellConfig::load_or_default()?;
    let api_key = require_credential(&config.completion.api_key_env).map_err(|e| {
        tracing::error!(error = %e, "cannot start without completion credentials");
        anyhow::anyhow!("{e}")
    })?;

    let channels = ChannelStore::open(config.paths.files_dir.clone())?;
    let log = ChatLog::new(config.paths.chat_log_file());
    let conversation = Conversation::new(log, channels.clone(), config.identity.clone());

    let handlers = Handlers {
        chat: Arc::new(ChatCompletionResponder::new(
            &config.completion,
            api_key.clone(),
            &config.identity,
            ResponderFlavor::Chat,
        )),
        search: Arc::new(ChatCompletionResponder::new(
            &config.completion,
            api_key,
            &config.identity,
            ResponderFlavor::Realtime,
        )),
        automation: Arc::new(LoggingAutomation),
        speech: Arc::new(ConsoleSpeech::new(&config.identity.assistant_name)),
    };

    let mut worker = WorkerCommand::from_config(&config.image);
    worker.program = resolve_worker_program(worker.program);
    let images = Arc::new(ImageJobCoordinator::new(
        channels.clone(),
        config.polling.image_interval(),
        worker,
    ));

    let router = DecisionRouter::new(
        handlers,
        conversation.clone(),
        StatusBoard::new(channels.clone()),
        images,
        RouterSettings {
            exit_grace: Duration::from_millis(config.exit_grace_ms),
            image_timeout: Duration::from_secs(config.image.completion_timeout_secs),
        },
    );

    let orchestrator = Orchestrator::new(
        channels.clone(),
        conversation,
        Arc::new(ConsoleRecognizer::new(&config.identity.username)),
        Arc::new(PrefixClassifier),
        router,
        config.polling.mic_interval(),
    );
    orchestrator.bootstrap()?;

    // No GUI toggles the mic in console mode, so keep it on.
    MicSwitch::new(channels).set(true)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; shutting down");
            ctrl_c.cancel();
        }
    });

    match orchestrator.run(cancel).await? {
        LoopExit::ExitRequested => tracing::info!("session ended by user"),
        LoopExit::Cancelled => tracing::info!("session cancelled"),
    }
    Ok(())
}

/// Prefer the worker binary sitting next to this executable when the
/// configured program is the bare default name.
fn resolve_worker_program(configured: PathBuf) -> PathBuf {
    if configured.as_os_str() != WORKER_BIN {
        return configured;
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(WORKER_BIN)))
        .filter(|candidate| candidate.exists())
        .unwrap_or(configured)
}
