//! Thumbnail acquisition infrastructure.
//!
//! This module provides:
//! - A size-aware LRU memory cache
//! - The target → URL request table
//! - The serial download worker and its delivery hop
//! - The downloader facade driven by the UI context
//! - HTTP and `image` crate adapters for fetching and decoding

pub mod decoder;
pub mod delivery;
pub mod downloader;
pub mod http_fetcher;
pub mod memory_cache;
pub mod request_table;
pub mod worker;

pub use decoder::ImageCrateDecoder;
pub use delivery::{DeliveryReceiver, DeliverySender, delivery_channel};
pub use downloader::ThumbnailDownloader;
pub use http_fetcher::HttpImageFetcher;
pub use memory_cache::{BoundedImageCache, CacheBudget, CacheStats};
pub use request_table::RequestTable;
pub use worker::{DownloadWorker, WorkerCommand};
