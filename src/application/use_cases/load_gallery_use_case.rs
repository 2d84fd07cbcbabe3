//! Gallery loading use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::GalleryItem;
use crate::domain::errors::GalleryError;
use crate::domain::ports::GalleryPort;

/// Loads the item list the gallery grid is built from.
#[derive(Clone)]
pub struct LoadGalleryUseCase {
    gallery_port: Arc<dyn GalleryPort>,
}

impl LoadGalleryUseCase {
    /// Creates new gallery loading use case.
    #[must_use]
    pub const fn new(gallery_port: Arc<dyn GalleryPort>) -> Self {
        Self { gallery_port }
    }

    /// Fetches the listing once and keeps only items with a thumbnail URL.
    ///
    /// # Errors
    /// Returns error if the listing cannot be fetched.
    pub async fn execute(&self) -> Result<Vec<GalleryItem>, GalleryError> {
        debug!("Loading gallery listing");

        let items = self.gallery_port.fetch_items().await.map_err(|e| {
            warn!(error = %e, recoverable = e.is_recoverable(), "Gallery listing failed");
            e
        })?;

        let total = items.len();
        let items: Vec<GalleryItem> = items.into_iter().filter(GalleryItem::has_url).collect();

        if items.len() < total {
            debug!(dropped = total - items.len(), "Dropped items without thumbnail URL");
        }
        info!(count = items.len(), "Gallery listing loaded");

        Ok(items)
    }
}
