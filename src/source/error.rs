//! Error types for the URL source.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the URL list.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input file could not be opened.
    #[error("cannot open URL source {path}: {source}")]
    Unavailable {
        /// The input path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Reading failed part-way through the file (IO error or invalid UTF-8).
    #[error("error reading URL source {path} at line {line}: {source}")]
    Read {
        /// The input path.
        path: PathBuf,
        /// 1-based line number that failed to read.
        line: usize,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
