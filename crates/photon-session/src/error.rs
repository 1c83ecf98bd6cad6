//! Error types for session operations.

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing the cookie store failed.
    #[error("Cookie store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cookie store contents could not be (de)serialized.
    #[error("Cookie store format error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;
