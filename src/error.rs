//! Error types for stompwire.

use thiserror::Error;

/// Main error type for all stompwire operations.
#[derive(Debug, Error)]
pub enum StompError {
    /// Invalid frame: unknown command, empty input, or a missing required argument.
    #[error("Frame error: {0}")]
    Frame(String),

    /// A handler expected a header the received frame does not carry.
    #[error("Missing header: {0}")]
    MissingHeader(String),

    /// Input handed to the dispatcher that is neither frame text nor a parsed frame.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// JSON error while loading configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using StompError.
pub type Result<T> = std::result::Result<T, StompError>;
