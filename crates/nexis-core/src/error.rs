use thiserror::Error;

/// Top-level error type for Nexis.
#[derive(Debug, Error)]
pub enum NexisError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Memory/storage error.
    #[error("memory error: {0}")]
    Memory(String),

    /// Speech input or output error.
    #[error("voice error: {0}")]
    Voice(String),

    /// Process or system-action launch error.
    #[error("launcher error: {0}")]
    Launcher(String),

    /// Knowledge lookup error.
    #[error("knowledge error: {0}")]
    Knowledge(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
