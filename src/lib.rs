//! Photo gallery with an asynchronous, cancellable thumbnail downloader.
//!
//! Display targets request thumbnails by URL; a background worker fetches,
//! decodes and caches them in a memory-bounded LRU cache, and hands each
//! result back to the UI context only if the target still wants that URL.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing the headless gallery view.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "photo-gallery";
