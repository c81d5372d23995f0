//! Error types for directory walking and record loading

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for walker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for directory walking and record loading
#[derive(Debug, Error)]
pub enum Error {
    /// The walk root does not name a directory
    #[error("Not a valid directory path: {}", .path.display())]
    NotADirectory {
        /// The offending path
        path: PathBuf,
    },

    /// I/O failure while traversing the tree or reading a file
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being read when the failure occurred
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A selected file did not hold valid JSON
    #[error("Malformed JSON in {}: {source}", .path.display())]
    Json {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// A parsed document was rejected by the collection
    #[error(transparent)]
    Place(#[from] gazetteer_core::Error),
}
