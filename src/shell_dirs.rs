//! Centralized application directory paths for voxshell.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | App data | `~/Library/Application Support/voxshell/` | `~/.local/share/voxshell/` |
//! | Config | `~/Library/Application Support/voxshell/` | `~/.config/voxshell/` |
//!
//! # Environment Overrides
//!
//! - `VOXSHELL_DATA_DIR` overrides [`data_dir`]
//! - `VOXSHELL_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Holds the channel files, chat history, generated images, and logs.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("VOXSHELL_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("voxshell"))
        .unwrap_or_else(|| PathBuf::from("/tmp/voxshell-data"))
}

/// Application config directory.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("VOXSHELL_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("voxshell"))
        .unwrap_or_else(|| PathBuf::from("/tmp/voxshell-config"))
}

/// Directory holding one file per channel key (`data_dir()/files/`).
#[must_use]
pub fn files_dir() -> PathBuf {
    data_dir().join("files")
}

/// Chat history and generated image directory (`data_dir()/data/`).
#[must_use]
pub fn history_dir() -> PathBuf {
    data_dir().join("data")
}

/// Log file directory (`data_dir()/logs/`).
#[must_use]
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
