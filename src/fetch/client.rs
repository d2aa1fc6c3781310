//! reqwest-backed [`Fetcher`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::Fetcher;
use super::constants::CONNECT_TIMEOUT_SECS;
use super::error::FetchError;
use crate::user_agent;

/// HTTP fetcher that performs one GET per call with a per-request timeout.
///
/// The underlying client is created once and reused across fetches so
/// connections are pooled.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use snapurl_core::fetch::{Fetcher, HttpFetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = HttpFetcher::new(Duration::from_secs(10))?;
/// let body = fetcher.fetch("https://example.com/").await?;
/// println!("{} bytes", body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the client cannot be constructed
    /// (for example when the TLS backend fails to initialize).
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let connect_timeout = timeout.min(Duration::from_secs(CONNECT_TIMEOUT_SECS));
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent::default_fetch_user_agent())
            .build()?;

        debug!(timeout_ms = timeout.as_millis(), "created HTTP fetcher");
        Ok(Self { client, timeout })
    }

    /// Returns the configured per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::invalid_url(url));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(FetchError::http_status(url, status));
        }

        // No charset decoding: the snapshot must match the bytes on the wire.
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::body(url, e))?
            .to_vec();

        debug!(status, bytes = body.len(), "fetch complete");
        Ok(body)
    }
}
