//! File-backed single-slot channels.
//!
//! Each channel is one small text file under a shared directory; the key is
//! the file name. A channel holds exactly one value with no history. Writers
//! overwrite the whole value and the last writer wins. Readers treat a
//! missing file as "no value yet".
//!
//! Writes go through a temp file and a rename so a poller in another process
//! never observes a half-written value.
//!
//! # Well-known keys
//!
//! | Key | File | Writer | Reader |
//! |-----|------|--------|--------|
//! | [`ChannelKey::Mic`] | `Mic.data` | GUI | orchestrator |
//! | [`ChannelKey::Status`] | `Status.data` | orchestrator | GUI |
//! | [`ChannelKey::Responses`] | `Responses.data` | orchestrator | GUI |
//! | [`ChannelKey::Database`] | `Database.data` | orchestrator | orchestrator |
//! | [`ChannelKey::ImageJob`] | `ImageGeneration.data` | orchestrator, worker | worker |
//! | [`ChannelKey::GeneratedImages`] | `GeneratedImages.data` | worker | GUI |

pub mod watch;

use crate::error::{Result, ShellError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes temp files of concurrent writers within one process.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Purpose-keyed channel identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKey {
    /// Microphone enable flag (`"True"` / `"False"`).
    Mic,
    /// Assistant status label.
    Status,
    /// Transcript rendered by the GUI.
    Responses,
    /// Flattened transcript of every persisted turn.
    Database,
    /// Pending image job (`"<prompt>;<ready>"`).
    ImageJob,
    /// Listing of generated image paths.
    GeneratedImages,
}

impl ChannelKey {
    /// Every well-known key.
    pub const ALL: [ChannelKey; 6] = [
        Self::Mic,
        Self::Status,
        Self::Responses,
        Self::Database,
        Self::ImageJob,
        Self::GeneratedImages,
    ];

    /// Backing file name inside the channel directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Mic => "Mic.data",
            Self::Status => "Status.data",
            Self::Responses => "Responses.data",
            Self::Database => "Database.data",
            Self::ImageJob => "ImageGeneration.data",
            Self::GeneratedImages => "GeneratedImages.data",
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Handle on the shared channel directory.
///
/// Cheap to clone; every clone addresses the same files.
#[derive(Debug, Clone)]
pub struct ChannelStore {
    dir: PathBuf,
}

impl ChannelStore {
    /// Open the channel directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Channel`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ShellError::Channel(format!(
                "failed to create channel directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// Returns the channel directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the backing file of a channel.
    pub fn path(&self, key: ChannelKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Read the current value of a channel.
    ///
    /// Returns `None` when the channel has never been written. Other read
    /// failures are logged and also reported as `None`; a poller retries on
    /// its next tick.
    pub fn read(&self, key: ChannelKey) -> Option<String> {
        let path = self.path(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(channel = %key, error = %e, "channel read failed");
                None
            }
        }
    }

    /// Overwrite the value of a channel.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Channel`] if the temp file cannot be written or
    /// renamed into place.
    pub fn write(&self, key: ChannelKey, value: &str) -> Result<()> {
        let path = self.path(key);
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp_path = self.dir.join(format!(
            ".{}.{}.{seq}.tmp",
            key.file_name(),
            std::process::id()
        ));

        std::fs::write(&tmp_path, value.as_bytes()).map_err(|e| {
            ShellError::Channel(format!(
                "failed to write temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        if let Ok(file) = std::fs::File::open(&tmp_path) {
            let _ = file.sync_all();
        }

        std::fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            ShellError::Channel(format!(
                "failed to replace channel file {}: {e}",
                path.display()
            ))
        })?;

        tracing::trace!(channel = %key, bytes = value.len(), "channel written");
        Ok(())
    }

    /// Returns `true` if the channel has a value.
    pub fn exists(&self, key: ChannelKey) -> bool {
        self.path(key).is_file()
    }
}
