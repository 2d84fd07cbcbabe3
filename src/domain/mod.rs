//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{GalleryItem, TargetHandle, ThumbnailImage};
pub use errors::{DecodeError, DownloaderError, FetchError, GalleryError};
pub use ports::{GalleryPort, ImageCachePort, ImageDecoderPort, ImageFetcherPort, ThumbnailListener};
