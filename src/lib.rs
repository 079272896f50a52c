//! Voxshell: the coordination layer of a voice-driven desktop assistant.
//!
//! Independent processes (GUI, orchestrator, image worker) cooperate through
//! small files in a shared directory:
//!
//! ```text
//!   GUI ──Mic──▶ Orchestrator ──ImageGeneration──▶ Image worker
//!    ▲            │    │                                │
//!    │            │    └──▶ ChatLog.json                │
//!    └─Status/Responses/Database─┘   ◀─GeneratedImages──┘
//! ```
//!
//! - [`channel`]: file-backed, last-writer-wins key/value channels
//! - [`orchestrator`]: the mic-triggered recognize → classify → route loop
//! - [`router`]: directive precedence, merging and handler dispatch
//! - [`image`]: the image job hand-off and the worker side of it
//! - [`gui_feed`]: what a GUI polls and the one thing it writes

pub mod channel;
pub mod chat_log;
pub mod config;
pub mod conversation;
pub mod directive;
pub mod error;
pub mod external;
pub mod gui_feed;
pub mod handlers;
pub mod image;
pub mod logging;
pub mod orchestrator;
pub mod router;
pub mod shell_dirs;
pub mod status;
pub mod text;

#[cfg(test)]
mod test_utils;

pub use channel::{ChannelKey, ChannelStore};
pub use chat_log::{ChatLog, ChatTurn, Role};
pub use config::ShellConfig;
pub use conversation::Conversation;
pub use directive::Directive;
pub use error::{Result, ShellError};
pub use gui_feed::{GuiFeed, GuiSnapshot};
pub use handlers::Handlers;
pub use orchestrator::{CycleOutcome, LoopExit, Orchestrator};
pub use router::{DecisionRouter, RouteOutcome, RouterSettings};
pub use status::{AssistantStatus, MicSwitch, StatusBoard};
