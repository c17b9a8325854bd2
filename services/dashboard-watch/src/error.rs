//! Error types for the dashboard client

/// Errors that can occur in the dashboard client
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sound error: {0}")]
    Sound(String),
}

/// Result type alias for dashboard client operations
pub type Result<T> = std::result::Result<T, WatchError>;
