//! HTTP adapter for fetching thumbnail bytes.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::domain::errors::FetchError;
use crate::domain::ports::ImageFetcherPort;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent sent with image requests.
pub const DEFAULT_USER_AGENT: &str = concat!("photo-gallery/", env!("CARGO_PKG_VERSION"));

/// Fetches image bytes over HTTP(S) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher with the given timeout and user agent.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a fetcher with default settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS), DEFAULT_USER_AGENT)
    }
}

#[async_trait]
impl ImageFetcherPort for HttpImageFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        if reqwest::Url::parse(url).is_err() {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::transport(url, "request timed out")
            } else if e.is_connect() {
                FetchError::transport(url, "failed to connect")
            } else {
                FetchError::transport(url, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Image request rejected");
            return Err(FetchError::status(url, status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::body(url, e.to_string()))?;

        debug!(url = %url, size = bytes.len(), "Fetched image bytes");
        Ok(bytes)
    }
}
