//! Error types for the store module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while persisting one content item.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system error while creating the partition directory or writing the file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
