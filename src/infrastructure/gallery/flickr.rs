//! Flickr photo listing client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::dto::FlickrResponse;
use crate::domain::entities::GalleryItem;
use crate::domain::errors::GalleryError;
use crate::domain::ports::GalleryPort;
use crate::infrastructure::config::GalleryConfig;
use crate::infrastructure::image::http_fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

const RECENT_PHOTOS_METHOD: &str = "flickr.photos.getRecent";
const SMALL_THUMBNAIL_EXTRA: &str = "url_s";

/// Lists recent photos from the Flickr REST API.
#[derive(Debug, Clone)]
pub struct FlickrGalleryClient {
    client: Client,
    endpoint: String,
    api_key: String,
    per_page: u32,
}

impl FlickrGalleryClient {
    /// Creates a client for `endpoint`.
    ///
    /// # Errors
    /// Returns [`GalleryError::MissingApiKey`] for a blank key, or a network
    /// error if the HTTP client cannot be created.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        per_page: u32,
    ) -> Result<Self, GalleryError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GalleryError::MissingApiKey);
        }

        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GalleryError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            per_page: per_page.max(1),
        })
    }

    /// Creates a client from the `[gallery]` config section.
    ///
    /// # Errors
    /// Returns [`GalleryError::MissingApiKey`] if no key is configured.
    pub fn from_config(config: &GalleryConfig) -> Result<Self, GalleryError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or(GalleryError::MissingApiKey)?;
        Self::new(&config.endpoint, api_key, config.per_page)
    }

    fn into_items(response: FlickrResponse) -> Result<Vec<GalleryItem>, GalleryError> {
        if response.stat != "ok" {
            return Err(GalleryError::Api {
                code: response.code.unwrap_or_default(),
                message: response
                    .message
                    .unwrap_or_else(|| format!("stat {}", response.stat)),
            });
        }

        let photos = response
            .photos
            .ok_or_else(|| GalleryError::parse("missing photos payload"))?;

        let total = photos.photo.len();
        let items: Vec<GalleryItem> = photos
            .photo
            .into_iter()
            .filter_map(|photo| {
                photo
                    .url_s
                    .map(|url| GalleryItem::new(photo.id, photo.title, url))
            })
            .collect();

        if items.len() < total {
            debug!(skipped = total - items.len(), "Skipped photos without thumbnail URL");
        }
        Ok(items)
    }
}

#[async_trait]
impl GalleryPort for FlickrGalleryClient {
    async fn fetch_items(&self) -> Result<Vec<GalleryItem>, GalleryError> {
        let per_page = self.per_page.to_string();

        debug!(endpoint = %self.endpoint, per_page = self.per_page, "Fetching recent photos");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("method", RECENT_PHOTOS_METHOD),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("nojsoncallback", "1"),
                ("extras", SMALL_THUMBNAIL_EXTRA),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach photo service");
                if e.is_timeout() {
                    GalleryError::network("request timed out")
                } else if e.is_connect() {
                    GalleryError::network("failed to connect to photo service")
                } else {
                    GalleryError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::network(format!(
                "photo service returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GalleryError::network(format!("failed to read response: {e}")))?;

        let parsed: FlickrResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse photo listing");
            GalleryError::parse(e.to_string())
        })?;

        let items = Self::into_items(parsed)?;
        debug!(count = items.len(), "Fetched gallery items");
        Ok(items)
    }
}
