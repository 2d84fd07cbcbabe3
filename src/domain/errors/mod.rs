//! Domain error types.

mod decode_error;
mod downloader_error;
mod fetch_error;
mod gallery_error;

pub use decode_error::DecodeError;
pub use downloader_error::{DownloaderError, ThumbnailError};
pub use fetch_error::FetchError;
pub use gallery_error::GalleryError;
