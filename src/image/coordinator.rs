//! Orchestrator side of the image job hand-off.
//!
//! [`ImageJobCoordinator::submit`] never waits for generation: it writes the
//! job, makes sure a worker process is running, and returns an
//! [`ImageJobHandle`] the caller may await with a bounded timeout or simply
//! drop.
//!
//! The worker is a detached OS process. Dropping the coordinator, or the
//! orchestrator exiting, leaves a running generation to finish.

use super::ImageJob;
use crate::channel::{ChannelKey, ChannelStore};
use crate::config::ImageConfig;
use crate::error::{Result, ShellError};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;
use tokio::process::{Child, Command};

/// How to start the worker process.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl WorkerCommand {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

/// Observed state of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Still marked ready; the worker has not finished it.
    Pending,
    /// The worker reset the job with the same prompt.
    Completed,
    /// Another submit replaced the prompt before this one finished.
    Superseded,
}

/// Writes image jobs and supervises the worker process.
pub struct ImageJobCoordinator {
    channels: ChannelStore,
    poll_interval: Duration,
    worker_command: Option<WorkerCommand>,
    worker: Mutex<Option<Child>>,
}

impl ImageJobCoordinator {
    /// Coordinator that launches `worker_command` on demand.
    pub fn new(
        channels: ChannelStore,
        poll_interval: Duration,
        worker_command: WorkerCommand,
    ) -> Self {
        Self {
            channels,
            poll_interval,
            worker_command: Some(worker_command),
            worker: Mutex::new(None),
        }
    }

    /// Coordinator for a worker that is started and supervised elsewhere.
    pub fn detached(channels: ChannelStore, poll_interval: Duration) -> Self {
        Self {
            channels,
            poll_interval,
            worker_command: None,
            worker: Mutex::new(None),
        }
    }

    /// Publish a job for `prompt` and ensure the worker is running.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::ImageJob`] if the job cannot be written. A worker
    /// that fails to start is logged only; the job stays on the channel for
    /// whichever worker picks it up later.
    pub fn submit(&self, prompt: &str) -> Result<ImageJobHandle> {
        let job = ImageJob::pending(prompt);
        self.channels
            .write(ChannelKey::ImageJob, &job.encode())
            .map_err(|e| ShellError::ImageJob(format!("cannot publish image job: {e}")))?;
        tracing::info!(prompt = %job.prompt, "image job submitted");

        self.ensure_worker();

        Ok(ImageJobHandle {
            prompt: job.prompt,
            channels: self.channels.clone(),
            poll_interval: self.poll_interval,
        })
    }

    /// The job currently on the channel, if any.
    pub fn current_job(&self) -> Option<ImageJob> {
        self.channels
            .read(ChannelKey::ImageJob)
            .and_then(|raw| ImageJob::decode(&raw))
    }

    /// `true` if a worker child spawned by this coordinator is alive.
    pub fn worker_running(&self) -> bool {
        let mut guard = match self.worker.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        child_alive(guard.as_mut())
    }

    fn ensure_worker(&self) {
        let Some(command) = &self.worker_command else {
            return;
        };

        let mut guard = match self.worker.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if child_alive(guard.as_mut()) {
            tracing::debug!("image worker already running");
            return;
        }

        match Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => {
                tracing::info!(
                    program = %command.program.display(),
                    pid = child.id().unwrap_or_default(),
                    "image worker started"
                );
                *guard = Some(child);
            }
            Err(e) => {
                tracing::warn!(
                    program = %command.program.display(),
                    error = %e,
                    "failed to start image worker"
                );
                *guard = None;
            }
        }
    }
}

fn child_alive(child: Option<&mut Child>) -> bool {
    match child {
        Some(child) => matches!(child.try_wait(), Ok(None)),
        None => false,
    }
}

/// Completion tracker for one submitted prompt.
#[derive(Debug, Clone)]
pub struct ImageJobHandle {
    prompt: String,
    channels: ChannelStore,
    poll_interval: Duration,
}

impl ImageJobHandle {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Inspect the channel once.
    pub fn state(&self) -> JobState {
        match self
            .channels
            .read(ChannelKey::ImageJob)
            .and_then(|raw| ImageJob::decode(&raw))
        {
            Some(job) if job.prompt != self.prompt => JobState::Superseded,
            Some(job) if !job.ready => JobState::Completed,
            Some(_) => JobState::Pending,
            None => JobState::Superseded,
        }
    }

    /// Poll until the job leaves [`JobState::Pending`].
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::ImageJob`] if `timeout` elapses first.
    pub async fn wait_for_completion(&self, timeout: Duration) -> Result<JobState> {
        let poll = async {
            loop {
                let state = self.state();
                if state != JobState::Pending {
                    return state;
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.map_err(|_| {
            ShellError::ImageJob(format!(
                "image job {:?} not completed within {timeout:?}",
                self.prompt
            ))
        })
    }
}
