//! Shared HTTP client for index and paper requests.
//!
//! One reqwest [`Client`] is built per run and reused for the index document
//! and every paper fetch, taking advantage of connection pooling.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::user_agent;

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout (2 minutes; papers can be large scans).
pub const READ_TIMEOUT_SECS: u64 = 120;

/// Errors from a single HTTP fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (DNS, connection refused, TLS, ...).
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out.
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// Non-success HTTP status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// Local file read failed (for `file://` sources).
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The path could not be joined onto the base URL.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// The client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Classifies a reqwest error into a timeout or network error.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
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

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Response body and status of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub status: u16,
    pub bytes: Vec<u8>,
}

/// HTTP client wrapper with the project's timeout and User-Agent policy.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] when the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] when the TLS backend cannot be initialized.
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(|source| FetchError::Client { source })?;
        Ok(Self { client })
    }

    /// Fetches a URL into memory.
    ///
    /// With `bypass_cache` the request asks intermediaries to revalidate
    /// instead of serving a stored copy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HttpStatus`] on non-success status codes and
    /// [`FetchError::Network`]/[`FetchError::Timeout`] on transport failures.
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn get_bytes(
        &self,
        url: &Url,
        bypass_cache: bool,
    ) -> Result<FetchedBody, FetchError> {
        let mut request = self.client.get(url.clone());
        if bypass_cache {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        let response = request
            .send()
            .await
            .map_err(|error| FetchError::from_reqwest(url.as_str(), error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url.as_str(), status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|error| FetchError::from_reqwest(url.as_str(), error))?;
        debug!(status = status.as_u16(), bytes = bytes.len(), "fetched");

        Ok(FetchedBody {
            status: status.as_u16(),
            bytes: bytes.to_vec(),
        })
    }
}

/// Joins a site-relative path onto a base URL.
///
/// The path is treated as root-relative (a leading `/` is added when missing),
/// but keeps any path prefix of the base URL, so a site hosted under
/// `https://host/pastpapers/` resolves `papers/a.pdf` to
/// `https://host/pastpapers/papers/a.pdf`.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] when the result is not a valid URL.
pub fn join_site_path(base: &Url, path: &str) -> Result<Url, FetchError> {
    let relative = path.trim_start_matches('/');
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }
    base.join(relative)
        .map_err(|_| FetchError::invalid_url(format!("{base}{relative}")))
}
