// Catalog loading errors

use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading a dataset into a catalog
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset file could not be read
    #[error("Failed to read dataset '{dataset}' from {}: {source}", path.display())]
    Io {
        /// Dataset name
        dataset: &'static str,
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Dataset is not valid JSON for its record type
    #[error("Invalid JSON in dataset '{dataset}': {source}")]
    Json {
        /// Dataset name
        dataset: &'static str,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Records were rejected by the search engine
    #[error("Invalid records in dataset '{dataset}': {source}")]
    Catalog {
        /// Dataset name
        dataset: &'static str,
        /// Underlying error
        #[source]
        source: busca::Error,
    },
}
