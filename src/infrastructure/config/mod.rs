//! Application configuration.

/// Config structure and CLI merging.
pub mod app_config;
/// Command-line arguments.
pub mod args;
/// Config file persistence.
pub mod storage;

pub use app_config::{AppConfig, DownloaderConfig, GalleryConfig, GridConfig, LogLevel};
pub use args::CliArgs;
pub use storage::{ConfigError, StorageManager};
