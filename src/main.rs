use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use photo_gallery::application::LoadGalleryUseCase;
use photo_gallery::infrastructure::{
    AppConfig, CliArgs, FlickrGalleryClient, StorageManager, ThumbnailDownloader,
};
use photo_gallery::presentation::{GalleryApp, SlotHandle};

fn init_logging(config: &AppConfig) -> Result<()> {
    let default_level = LevelFilter::from_level(config.log_level.to_tracing_level());
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), level = %config.log_level, "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Ignoring unreadable .env file: {e}");
    }

    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);

    Ok(config)
}

fn create_app(config: &AppConfig) -> Result<GalleryApp> {
    let gallery_client = Arc::new(FlickrGalleryClient::from_config(&config.gallery)?);
    let downloader = ThumbnailDownloader::<SlotHandle>::from_config(&config.downloader)?;

    if config.downloader.cache_budget_kb.is_none() {
        info!(
            budget_kb = downloader.cache().budget_kb(),
            divisor = config.downloader.memory_fraction_divisor,
            "Cache budget derived from available memory"
        );
    }

    Ok(GalleryApp::new(
        LoadGalleryUseCase::new(gallery_client),
        downloader,
        config.grid.clone(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = load_config()?;
    init_logging(&config)?;

    info!(version = photo_gallery::VERSION, "Starting {}", photo_gallery::NAME);

    let app = create_app(&config)?;
    let summary = app.run().await.inspect_err(|e| {
        warn!(error = %e, "Gallery run failed");
    })?;

    println!("{summary}");
    Ok(())
}
