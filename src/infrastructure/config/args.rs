//! Command-line arguments.

use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command-line overrides for [`AppConfig`](super::AppConfig).
#[derive(Debug, Parser)]
#[command(
    name = "photo-gallery",
    version,
    about = "Browse a remote photo gallery with cancellable background thumbnail loading",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Photo service API key.
    #[arg(long, env = "FLICKR_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Photo service REST endpoint.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Number of photos to list.
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Fixed thumbnail cache budget in KiB.
    #[arg(long, value_name = "KIB")]
    pub cache_budget_kb: Option<usize>,

    /// Image request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Downscale thumbnails wider than this many pixels.
    #[arg(long, value_name = "PX")]
    pub max_thumbnail_width: Option<u32>,

    /// Grid columns.
    #[arg(long)]
    pub columns: Option<usize>,

    /// Visible grid rows.
    #[arg(long)]
    pub visible_rows: Option<usize>,
}
