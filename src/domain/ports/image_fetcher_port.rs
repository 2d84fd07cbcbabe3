//! Port definition for fetching raw image bytes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FetchError;

/// Port for downloading the bytes behind a thumbnail URL.
///
/// Timeouts are owned by the implementation.
#[async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Fetches the raw bytes for `url`.
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Mock fetcher serving canned payloads and recording every call.
    ///
    /// Image payloads are `"{width}x{height}"` strings understood by
    /// `MockImageDecoder`.
    #[derive(Default)]
    pub struct MockImageFetcher {
        responses: Mutex<HashMap<String, Result<Bytes, FetchError>>>,
        calls: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl MockImageFetcher {
        /// Creates a fetcher that knows no URLs.
        pub fn new() -> Self {
            Self::default()
        }

        /// Serves an RGBA image of the given size for `url`.
        #[must_use]
        pub fn with_image(self, url: &str, width: u32, height: u32) -> Self {
            self.responses
                .lock()
                .insert(url.to_string(), Ok(Bytes::from(format!("{width}x{height}"))));
            self
        }

        /// Serves raw bytes for `url`.
        #[must_use]
        pub fn with_bytes(self, url: &str, bytes: &'static [u8]) -> Self {
            self.responses
                .lock()
                .insert(url.to_string(), Ok(Bytes::from_static(bytes)));
            self
        }

        /// Fails every fetch of `url` with `error`.
        #[must_use]
        pub fn with_failure(self, url: &str, error: FetchError) -> Self {
            self.responses.lock().insert(url.to_string(), Err(error));
            self
        }

        /// Sleeps before answering each fetch.
        #[must_use]
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Returns every URL fetched so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        /// Returns how often `url` was fetched.
        pub fn call_count(&self, url: &str) -> usize {
            self.calls.lock().iter().filter(|u| *u == url).count()
        }
    }

    #[async_trait]
    impl ImageFetcherPort for MockImageFetcher {
        async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
            self.calls.lock().push(url.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.responses
                .lock()
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::status(url, 404)))
        }
    }
}
