//! Port definition for the upstream photo listing.

use async_trait::async_trait;

use crate::domain::entities::GalleryItem;
use crate::domain::errors::GalleryError;

/// Port for listing the photos shown in the gallery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GalleryPort: Send + Sync {
    /// Fetches the current list of gallery items.
    async fn fetch_items(&self) -> Result<Vec<GalleryItem>, GalleryError>;
}
