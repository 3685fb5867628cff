//! Error types for session store operations.

/// Error type for session store operations.
///
/// A missing or expired session is not an error; lookups report it as
/// `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure reported by SQLite. Carried unchanged, never retried.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The configured table name is not a plain SQL identifier.
    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    /// A cleanup interval was configured outside of a Tokio runtime.
    #[error("Cleanup task requires a Tokio runtime")]
    NoRuntime,

    /// A cleanup sweep panicked or was cancelled before finishing.
    #[error("Cleanup sweep failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, Error>;
