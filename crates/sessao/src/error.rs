// Session errors

use thiserror::Error;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Session store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No session with this id, or it has expired
    #[error("Session not found or expired: {0}")]
    NotFound(String),

    /// Session was closed and no longer accepts messages
    #[error("Session already finished: {0}")]
    Finished(String),
}
