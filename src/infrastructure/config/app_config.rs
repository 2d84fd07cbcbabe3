//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::infrastructure::image::http_fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::infrastructure::image::memory_cache::DEFAULT_MEMORY_DIVISOR;

const APP_NAME: &str = "photo-gallery";
const APP_QUALIFIER: &str = "org";
const APP_ORGANIZATION: &str = "maktab";

/// Default Flickr REST endpoint.
pub const DEFAULT_GALLERY_ENDPOINT: &str = "https://api.flickr.com/services/rest/";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded from TOML and overridden by CLI flags.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Photo listing configuration.
    #[serde(default)]
    pub gallery: GalleryConfig,

    /// Thumbnail downloader configuration.
    #[serde(default)]
    pub downloader: DownloaderConfig,

    /// Headless grid configuration.
    #[serde(default)]
    pub grid: GridConfig,
}

/// Photo listing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// REST endpoint of the photo service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key sent with listing requests.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Number of photos requested per listing.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            per_page: default_per_page(),
        }
    }
}

/// Thumbnail downloader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Fixed cache budget in KiB. When unset the budget is derived from
    /// available memory.
    #[serde(default)]
    pub cache_budget_kb: Option<usize>,

    /// The cache gets `1 / memory_fraction_divisor` of available memory.
    #[serde(default = "default_memory_divisor")]
    pub memory_fraction_divisor: u64,

    /// Image request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent for image requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Thumbnails wider than this are downscaled after decoding.
    #[serde(default)]
    pub max_thumbnail_width: Option<u32>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            cache_budget_kb: None,
            memory_fraction_divisor: default_memory_divisor(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            max_thumbnail_width: None,
        }
    }
}

/// Headless grid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Slots per row.
    #[serde(default = "default_columns")]
    pub columns: usize,

    /// Rows visible at once; the slot pool holds `columns * visible_rows` slots.
    #[serde(default = "default_visible_rows")]
    pub visible_rows: usize,

    /// Rows advanced per scroll step.
    #[serde(default = "default_scroll_step_rows")]
    pub scroll_step_rows: usize,

    /// Delay between scroll steps in milliseconds.
    #[serde(default = "default_scroll_interval_ms")]
    pub scroll_interval_ms: u64,

    /// How long to wait for outstanding thumbnails after the last scroll.
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            visible_rows: default_visible_rows(),
            scroll_step_rows: default_scroll_step_rows(),
            scroll_interval_ms: default_scroll_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_GALLERY_ENDPOINT.to_string()
}

const fn default_per_page() -> u32 {
    100
}

const fn default_memory_divisor() -> u64 {
    DEFAULT_MEMORY_DIVISOR
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

const fn default_columns() -> usize {
    3
}

const fn default_visible_rows() -> usize {
    4
}

const fn default_scroll_step_rows() -> usize {
    2
}

const fn default_scroll_interval_ms() -> u64 {
    400
}

const fn default_idle_timeout_ms() -> u64 {
    1500
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_key) = args.api_key {
            self.gallery.api_key = Some(api_key);
        }
        if let Some(endpoint) = args.endpoint {
            self.gallery.endpoint = endpoint;
        }
        if let Some(per_page) = args.per_page {
            self.gallery.per_page = per_page;
        }
        if let Some(budget) = args.cache_budget_kb {
            self.downloader.cache_budget_kb = Some(budget);
        }
        if let Some(timeout) = args.timeout_secs {
            self.downloader.timeout_secs = timeout;
        }
        if let Some(max_width) = args.max_thumbnail_width {
            self.downloader.max_thumbnail_width = Some(max_width);
        }
        if let Some(columns) = args.columns {
            self.grid.columns = columns;
        }
        if let Some(rows) = args.visible_rows {
            self.grid.visible_rows = rows;
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("photo-gallery.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            gallery: GalleryConfig::default(),
            downloader: DownloaderConfig::default(),
            grid: GridConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config_sections() {
        let toml_content = r#"
            log_level = "debug"

            [gallery]
            api_key = "abc123"
            per_page = 30

            [downloader]
            cache_budget_kb = 4096
            max_thumbnail_width = 240

            [grid]
            columns = 4
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.gallery.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.gallery.per_page, 30);
        assert_eq!(config.gallery.endpoint, DEFAULT_GALLERY_ENDPOINT);
        assert_eq!(config.downloader.cache_budget_kb, Some(4096));
        assert_eq!(config.downloader.max_thumbnail_width, Some(240));
        assert_eq!(config.downloader.memory_fraction_divisor, 8);
        assert_eq!(config.grid.columns, 4);
        assert_eq!(config.grid.visible_rows, 4);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert!(config.gallery.api_key.is_none());
        assert!(config.downloader.cache_budget_kb.is_none());
        assert_eq!(config.downloader.timeout_secs, 30);
        assert_eq!(config.grid.columns, 3);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "photo-gallery",
            "--log-level",
            "trace",
            "--api-key",
            "from-cli",
            "--cache-budget-kb",
            "512",
            "--columns",
            "5",
        ]);

        config.merge_with_args(args);

        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.gallery.api_key.as_deref(), Some("from-cli"));
        assert_eq!(config.downloader.cache_budget_kb, Some(512));
        assert_eq!(config.grid.columns, 5);
        assert_eq!(config.grid.visible_rows, 4);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::default().to_string(), "info");
    }
}
