//! Headless gallery driver.

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::application::LoadGalleryUseCase;
use crate::domain::entities::{DeliveryOutcome, ThumbnailImage};
use crate::infrastructure::config::GridConfig;
use crate::infrastructure::image::{CacheStats, ThumbnailDownloader};

use super::grid::GalleryGrid;
use super::slot::SlotHandle;

/// What a gallery run did, printed by the binary on exit.
#[derive(Debug, Clone)]
pub struct GallerySummary {
    /// Items in the listing.
    pub items: usize,
    /// Number of viewport positions visited, including the first.
    pub scroll_steps: usize,
    /// Deliveries that reached a slot.
    pub delivered: usize,
    /// Deliveries dropped because their slot had moved on.
    pub stale: usize,
    /// Slots showing an image when the run ended.
    pub loaded_slots: usize,
    /// One line per slot in the final viewport.
    pub slots: Vec<String>,
    /// Memory cache statistics at the end of the run.
    pub cache: CacheStats,
}

impl std::fmt::Display for GallerySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Gallery: {} items, {} scroll steps, {} delivered, {} stale, {}/{} slots loaded",
            self.items,
            self.scroll_steps,
            self.delivered,
            self.stale,
            self.loaded_slots,
            self.slots.len()
        )?;
        for line in &self.slots {
            writeln!(f, "  {line}")?;
        }
        write!(f, "{}", self.cache)
    }
}

/// Loads the listing and scrolls a [`GalleryGrid`] through it while the
/// downloader fills the slots.
pub struct GalleryApp {
    load_gallery: LoadGalleryUseCase,
    downloader: ThumbnailDownloader<SlotHandle>,
    config: GridConfig,
}

impl GalleryApp {
    /// Creates the app around a stopped downloader.
    #[must_use]
    pub const fn new(
        load_gallery: LoadGalleryUseCase,
        downloader: ThumbnailDownloader<SlotHandle>,
        config: GridConfig,
    ) -> Self {
        Self {
            load_gallery,
            downloader,
            config,
        }
    }

    /// Runs until the grid has reached the end of the listing and no
    /// thumbnail has arrived for `idle_timeout_ms`.
    ///
    /// # Errors
    /// Returns error if the listing cannot be loaded or the downloader
    /// cannot be started.
    pub async fn run(mut self) -> color_eyre::Result<GallerySummary> {
        let items = self.load_gallery.execute().await?;
        let mut grid = GalleryGrid::new(items, self.config.columns, self.config.visible_rows);

        self.downloader
            .set_listener(|slot: &SlotHandle, image: ThumbnailImage| slot.bind_image(image));
        self.downloader.start()?;

        grid.scroll_to(0, &self.downloader)?;
        let mut scroll_steps = 1;
        let mut delivered = 0;
        let mut stale = 0;

        let step = self.config.scroll_step_rows.max(1);
        let last_row = grid.max_first_row();
        let idle_timeout = Duration::from_millis(self.config.idle_timeout_ms);

        let mut scroll_interval = interval(Duration::from_millis(
            self.config.scroll_interval_ms.max(1),
        ));
        scroll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        scroll_interval.tick().await;

        info!(
            items = grid.items().len(),
            rows = grid.total_rows(),
            slots = grid.slots().len(),
            "Gallery loaded"
        );

        loop {
            let scrolling = grid.first_row() < last_row;

            tokio::select! {
                biased;

                Some(outcome) = self.downloader.deliver_next() => {
                    match outcome {
                        DeliveryOutcome::Delivered => delivered += 1,
                        DeliveryOutcome::Stale => stale += 1,
                        DeliveryOutcome::NoListener | DeliveryOutcome::ShutDown => {}
                    }
                }

                _ = scroll_interval.tick(), if scrolling => {
                    let next_row = (grid.first_row() + step).min(last_row);
                    grid.scroll_to(next_row, &self.downloader)?;
                    scroll_steps += 1;
                }

                () = tokio::time::sleep(idle_timeout), if !scrolling => {
                    debug!("No thumbnail activity, finishing gallery run");
                    break;
                }

                else => break,
            }
        }

        self.downloader.shutdown();

        let summary = GallerySummary {
            items: grid.items().len(),
            scroll_steps,
            delivered,
            stale,
            loaded_slots: grid.loaded_count(),
            slots: grid.slots().iter().map(|slot| slot.to_string()).collect(),
            cache: self.downloader.cache_stats(),
        };

        info!(
            delivered = summary.delivered,
            stale = summary.stale,
            loaded = summary.loaded_slots,
            "Gallery run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::entities::GalleryItem;
    use crate::domain::errors::GalleryError;
    use crate::domain::ports::mocks::{MockGalleryPort, MockImageDecoder, MockImageFetcher};
    use crate::infrastructure::image::{BoundedImageCache, CacheBudget};

    fn grid_config() -> GridConfig {
        GridConfig {
            columns: 3,
            visible_rows: 1,
            scroll_step_rows: 1,
            scroll_interval_ms: 10,
            idle_timeout_ms: 300,
        }
    }

    fn app(port: MockGalleryPort, fetcher: MockImageFetcher) -> GalleryApp {
        let downloader = ThumbnailDownloader::new(
            Arc::new(BoundedImageCache::new(CacheBudget::from_kb(4096))),
            Arc::new(fetcher),
            Arc::new(MockImageDecoder),
        );
        GalleryApp::new(
            LoadGalleryUseCase::new(Arc::new(port)),
            downloader,
            grid_config(),
        )
    }

    #[tokio::test]
    async fn test_run_scrolls_to_end_and_fills_last_viewport() {
        let mut port = MockGalleryPort::new();
        port.expect_fetch_items().returning(|| {
            Ok((0..9)
                .map(|i| GalleryItem::new(i.to_string(), "", format!("{i}.jpg")))
                .collect())
        });
        let fetcher = (0..9).fold(MockImageFetcher::new(), |fetcher, i| {
            fetcher.with_image(&format!("{i}.jpg"), 6, 4)
        });

        let summary = app(port, fetcher).run().await.unwrap();

        assert_eq!(summary.items, 9);
        assert_eq!(summary.scroll_steps, 3);
        assert_eq!(summary.loaded_slots, 3);
        assert!(summary.delivered >= 3);
        assert_eq!(summary.slots.len(), 3);
        assert!(summary.slots[0].contains("#6"));
        assert!(summary.to_string().contains("Cache:"));
    }

    #[tokio::test]
    async fn test_run_fails_when_listing_fails() {
        let mut port = MockGalleryPort::new();
        port.expect_fetch_items()
            .returning(|| Err(GalleryError::Api { code: 100, message: "Invalid API Key".into() }));

        let result = app(port, MockImageFetcher::new()).run().await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_with_empty_listing_finishes() {
        let mut port = MockGalleryPort::new();
        port.expect_fetch_items().returning(|| Ok(Vec::new()));

        let summary = app(port, MockImageFetcher::new()).run().await.unwrap();

        assert_eq!(summary.items, 0);
        assert_eq!(summary.delivered, 0);
        assert_eq!(summary.loaded_slots, 0);
    }
}
