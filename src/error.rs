// Error types module

use crate::sink::SinkError;
use crate::thumbnail::ImageError;

/// Centralized error type for an invocation
///
/// Anything that reaches the caller as `Err` aborted the invocation. The two
/// skip conditions (unsupported format, degenerate scale) never surface
/// here; unsupported formats are reported through `GenerationReport`.
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    /// Configuration errors (missing env vars, invalid YAML, bad widths)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed inbound event
    #[error("Invalid event: {0}")]
    Event(String),

    /// Reading the source content stream failed
    #[error("Failed to read source content: {0}")]
    Read(#[source] std::io::Error),

    /// Decode, resize or encode failure
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Upload failure
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Blocking worker panicked or was cancelled
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for ThumbnailError {
    fn from(err: tokio::task::JoinError) -> Self {
        ThumbnailError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;
