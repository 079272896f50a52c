//! Error types for the voxshell coordination layer.

/// Top-level error type for routing and cross-process coordination.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// File-backed channel read/write error.
    #[error("channel error: {0}")]
    Channel(String),

    /// Chat history persistence error.
    #[error("chat log error: {0}")]
    ChatLog(String),

    /// Configuration error (including missing credentials at startup).
    #[error("config error: {0}")]
    Config(String),

    /// Image job submission or tracking error.
    #[error("image job error: {0}")]
    ImageJob(String),

    /// External collaborator (recognizer, classifier, speech) failure.
    #[error("handler error: {0}")]
    Handler(String),

    /// Automation handler failure. Not contained by the router.
    #[error("automation error: {0}")]
    Automation(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ShellError>;
