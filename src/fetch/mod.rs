//! Single-URL HTTP retrieval.
//!
//! The pipeline only depends on the [`Fetcher`] trait; [`HttpFetcher`] is the
//! production implementation. A fetch succeeds when the server answers with a
//! status below 400, and yields the response body bytes exactly as received.

mod client;
pub mod constants;
mod error;

use async_trait::async_trait;

pub use client::HttpFetcher;
pub use constants::DEFAULT_FETCH_TIMEOUT_SECS;
pub use error::FetchError;

/// Performs one network retrieval for a URL.
///
/// # Object Safety
///
/// This trait uses `async_trait` so the pipeline can hold an
/// `Arc<dyn Fetcher>` shared across spawned fetch tasks.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on invalid URLs, network failures, timeouts and
    /// HTTP status codes of 400 or above.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
