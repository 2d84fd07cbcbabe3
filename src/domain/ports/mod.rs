//! Port definitions for external collaborators.

mod gallery_port;
mod image_cache_port;
mod image_decoder_port;
mod image_fetcher_port;
mod thumbnail_listener;

pub use gallery_port::GalleryPort;
pub use image_cache_port::ImageCachePort;
pub use image_decoder_port::ImageDecoderPort;
pub use image_fetcher_port::ImageFetcherPort;
pub use thumbnail_listener::ThumbnailListener;

/// Test doubles for every port.
#[cfg(test)]
pub mod mocks {
    pub use super::gallery_port::MockGalleryPort;
    pub use super::image_decoder_port::mock::MockImageDecoder;
    pub use super::image_fetcher_port::mock::MockImageFetcher;
    pub use super::thumbnail_listener::mock::RecordingListener;
}
