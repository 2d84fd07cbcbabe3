//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Photo listing client.
pub mod gallery;
/// Thumbnail downloading, decoding and caching.
pub mod image;

pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use gallery::FlickrGalleryClient;
pub use image::{
    BoundedImageCache, CacheBudget, CacheStats, HttpImageFetcher, ImageCrateDecoder,
    ThumbnailDownloader,
};
