//! Error types for the `oobwatch` core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the core `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for `oobwatch` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The output file could not be created or truncated.
    #[error("Could not create output file {}: {source}", path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
