//! Error types for the generation store.

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Creating the database directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted timestamp could not be parsed back.
    #[error("Corrupt timestamp in row {id}: {source}")]
    Timestamp {
        /// The row's generation id.
        id: String,
        /// The underlying parse failure.
        source: chrono::ParseError,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
