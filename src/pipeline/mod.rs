//! Concurrent read → download → persist pipeline.
//!
//! - [`Pipeline`] wires the stages and runs the shutdown/drain protocol.
//! - [`AdmissionGate`] bounds how many fetches are in flight.
//! - [`RunStats`] aggregates counters across all stages.
//! - [`ShutdownController`] tracks the [`ShutdownState`] of a run.

mod config;
mod engine;
mod error;
mod gate;
mod shutdown;
mod stats;

pub use config::{
    ConfigError, DEFAULT_GRACE_PERIOD_SECS, DEFAULT_MAX_DOWNLOAD_CONCURRENCY,
    DEFAULT_QUEUE_CAPACITY, PipelineConfig, validate_concurrency,
};
pub use engine::{FetchedContent, Pipeline, PipelineOutcome};
pub use error::PipelineError;
pub use gate::{AdmissionGate, AdmissionPermit};
pub use shutdown::{ShutdownController, ShutdownState, wait_for_signal};
pub use stats::{RunStats, RunSummary};
