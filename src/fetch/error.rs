//! Error types for the fetch module.
//!
//! Every variant carries the URL so a single log line is enough to tell which
//! item failed and why.

use thiserror::Error;

/// Errors that can occur while fetching a single URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed or uses a scheme other than http/https.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request did not complete within the configured timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Server answered with a status code of 400 or above.
    #[error("url {url} responded with status code: {status}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be read or decoded as text.
    #[error("failed to read body from {url}: {source}")]
    Body {
        /// The URL whose body failed.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a transport error, promoting reqwest timeouts to [`FetchError::Timeout`].
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a body read error, promoting reqwest timeouts to [`FetchError::Timeout`].
    pub fn body(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Body { url, source }
        }
    }

    /// Returns the URL the error refers to.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url }
            | Self::Network { url, .. }
            | Self::Timeout { url }
            | Self::HttpStatus { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}
