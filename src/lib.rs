//! snapurl core library
//!
//! Reads a list of URLs from a file, fetches each one over HTTP with bounded
//! concurrency, and snapshots every successful response body to disk, while
//! keeping run statistics and honouring interrupt-driven shutdown.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`source`] - Lazy URL list reader (header skip, blank-line filtering)
//! - [`fetch`] - Single-URL HTTP retrieval behind the [`Fetcher`] trait
//! - [`store`] - Date-partitioned snapshot persistence behind the [`Store`] trait
//! - [`pipeline`] - Stage wiring, admission gate, statistics and shutdown/drain

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod fetch;
pub mod pipeline;
pub mod source;
pub mod store;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use fetch::{DEFAULT_FETCH_TIMEOUT_SECS, FetchError, Fetcher, HttpFetcher};
pub use pipeline::{
    AdmissionGate, ConfigError, DEFAULT_GRACE_PERIOD_SECS, DEFAULT_MAX_DOWNLOAD_CONCURRENCY,
    Pipeline, PipelineConfig, PipelineError, PipelineOutcome, RunStats, RunSummary,
    ShutdownState, validate_concurrency, wait_for_signal,
};
pub use source::{SourceError, UrlSource};
pub use store::{FileStore, Store, StoreError};
