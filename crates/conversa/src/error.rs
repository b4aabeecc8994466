// Conversation errors

use thiserror::Error;

/// Result type for conversation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from categorization and the chat backend
#[derive(Debug, Error)]
pub enum Error {
    /// A categorizer pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// No API key configured for the chat backend
    #[error("Chat backend API key is not configured")]
    MissingApiKey,

    /// Transport failure talking to the chat backend
    #[error("Chat backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Chat backend answered with an error status
    #[error("Chat backend returned {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// Chat backend answered without any text
    #[error("Chat backend returned no text content")]
    EmptyResponse,

    /// Session lookup or update failed
    #[error(transparent)]
    Session(#[from] sessao::Error),
}
