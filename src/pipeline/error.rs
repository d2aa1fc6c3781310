//! Error type for pipeline setup and execution.

use thiserror::Error;

use super::config::ConfigError;
use crate::source::SourceError;

/// Errors that abort a pipeline run before or while it starts.
///
/// Per-item fetch and persist failures never surface here; they are absorbed
/// into [`RunStats`](super::RunStats) and logged.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The URL source could not be opened.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The admission gate was closed unexpectedly.
    #[error("admission gate closed unexpectedly")]
    GateClosed,
}
