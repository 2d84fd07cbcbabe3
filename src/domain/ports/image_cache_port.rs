//! Port definition for decoded image caching.

use crate::domain::entities::ThumbnailImage;

/// Port for URL-keyed caching of decoded thumbnails.
/// Implementations must be thread-safe; callers never lock externally.
pub trait ImageCachePort: Send + Sync {
    /// Returns the cached image and marks it most-recently-used.
    fn get(&self, url: &str) -> Option<ThumbnailImage>;

    /// Returns the cached image without touching recency.
    fn peek(&self, url: &str) -> Option<ThumbnailImage>;

    /// Stores an image, evicting least-recently-used entries as needed.
    /// Returns false if the image could not be stored.
    fn put(&self, url: String, image: ThumbnailImage) -> bool;

    /// Stores an image only if the URL is not cached yet.
    /// Returns true if the image was inserted.
    fn put_if_absent(&self, url: String, image: ThumbnailImage) -> bool;

    /// Returns true if the URL is cached.
    fn contains(&self, url: &str) -> bool;

    /// Removes an image from the cache.
    fn evict(&self, url: &str);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all images from the cache.
    fn clear(&self);
}
