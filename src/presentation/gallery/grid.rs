//! Fixed pool of slots recycled over the gallery listing.

use tracing::debug;

use crate::domain::entities::GalleryItem;
use crate::domain::errors::DownloaderError;
use crate::infrastructure::image::ThumbnailDownloader;

use super::slot::{SlotHandle, ThumbnailSlot};

/// How the slots were filled by one [`GalleryGrid::scroll_to`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Row that is now at the top of the viewport.
    pub first_row: usize,
    /// Slots bound straight from the memory cache.
    pub from_cache: usize,
    /// Slots that now wait on a download.
    pub requested: usize,
    /// Slots past the end of the listing.
    pub empty: usize,
}

/// Headless stand-in for a recycling grid view.
///
/// Only `columns * visible_rows` slots exist; scrolling rebinds them to the
/// items that come into view.
#[derive(Debug)]
pub struct GalleryGrid {
    items: Vec<GalleryItem>,
    slots: Vec<SlotHandle>,
    columns: usize,
    first_row: usize,
}

impl GalleryGrid {
    /// Creates a grid over `items`. Zero dimensions are raised to one.
    #[must_use]
    pub fn new(items: Vec<GalleryItem>, columns: usize, visible_rows: usize) -> Self {
        let columns = columns.max(1);
        let slot_count = columns * visible_rows.max(1);
        let slots = (0..slot_count)
            .map(|index| SlotHandle::new(ThumbnailSlot::new(index)))
            .collect();

        Self {
            items,
            slots,
            columns,
            first_row: 0,
        }
    }

    /// Items in the listing.
    #[must_use]
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// The slot pool in display order.
    #[must_use]
    pub fn slots(&self) -> &[SlotHandle] {
        &self.slots
    }

    /// Row currently at the top of the viewport.
    #[must_use]
    pub const fn first_row(&self) -> usize {
        self.first_row
    }

    /// Number of rows needed to show every item.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.items.len().div_ceil(self.columns)
    }

    /// Last row that can sit at the top of the viewport.
    #[must_use]
    pub fn max_first_row(&self) -> usize {
        let visible_rows = self.slots.len() / self.columns;
        self.total_rows().saturating_sub(visible_rows)
    }

    /// Scrolls so that `first_row` is at the top and rebinds every slot.
    ///
    /// Each slot first shows its placeholder. A cached thumbnail is bound
    /// immediately; otherwise the slot is queued on the downloader.
    ///
    /// # Errors
    /// Returns error if the downloader has been shut down.
    pub fn scroll_to(
        &mut self,
        first_row: usize,
        downloader: &ThumbnailDownloader<SlotHandle>,
    ) -> Result<ScrollOutcome, DownloaderError> {
        if downloader.is_shut_down() {
            return Err(DownloaderError::ShutDown);
        }

        self.first_row = first_row.min(self.max_first_row());
        let first_item = self.first_row * self.columns;
        let mut outcome = ScrollOutcome {
            first_row: self.first_row,
            ..ScrollOutcome::default()
        };

        // Everything still queued belongs to the previous viewport.
        downloader.clear_pending();

        for (offset, slot) in self.slots.iter().enumerate() {
            let Some(item) = self.items.get(first_item + offset) else {
                slot.clear();
                downloader.forget(slot);
                outcome.empty += 1;
                continue;
            };

            slot.bind_item(item.clone());

            if let Some(image) = downloader.cached(item.url()) {
                downloader.forget(slot);
                slot.bind_image(image);
                outcome.from_cache += 1;
            } else {
                downloader.request_thumbnail(slot.clone(), item.url())?;
                outcome.requested += 1;
            }
        }

        debug!(
            first_row = outcome.first_row,
            from_cache = outcome.from_cache,
            requested = outcome.requested,
            "Grid rebound"
        );
        Ok(outcome)
    }

    /// Number of slots currently showing an image.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.image().is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::domain::entities::{DeliveryOutcome, ThumbnailImage};
    use crate::domain::ports::ImageCachePort;
    use crate::domain::ports::mocks::{MockImageDecoder, MockImageFetcher};
    use crate::infrastructure::image::{BoundedImageCache, CacheBudget};
    use tokio_test::assert_ok;

    fn items(count: usize) -> Vec<GalleryItem> {
        (0..count)
            .map(|i| GalleryItem::new(i.to_string(), format!("photo {i}"), format!("{i}.jpg")))
            .collect()
    }

    fn fetcher_for(count: usize) -> MockImageFetcher {
        (0..count).fold(MockImageFetcher::new(), |fetcher, i| {
            fetcher.with_image(&format!("{i}.jpg"), 8, 8)
        })
    }

    fn downloader(fetcher: MockImageFetcher) -> (ThumbnailDownloader<SlotHandle>, Arc<MockImageFetcher>) {
        let fetcher = Arc::new(fetcher);
        let mut downloader = ThumbnailDownloader::new(
            Arc::new(BoundedImageCache::new(CacheBudget::from_kb(4096))),
            fetcher.clone(),
            Arc::new(MockImageDecoder),
        );
        downloader.set_listener(|slot: &SlotHandle, image: ThumbnailImage| slot.bind_image(image));
        (downloader, fetcher)
    }

    #[test]
    fn test_geometry() {
        let grid = GalleryGrid::new(items(10), 3, 2);

        assert_eq!(grid.slots().len(), 6);
        assert_eq!(grid.total_rows(), 4);
        assert_eq!(grid.max_first_row(), 2);

        let degenerate = GalleryGrid::new(Vec::new(), 0, 0);
        assert_eq!(degenerate.slots().len(), 1);
        assert_eq!(degenerate.max_first_row(), 0);
    }

    #[tokio::test]
    async fn test_scroll_requests_uncached_and_delivers() {
        let (mut downloader, fetcher) = downloader(fetcher_for(6));
        assert_ok!(downloader.start());
        let mut grid = GalleryGrid::new(items(6), 3, 2);

        let outcome = grid.scroll_to(0, &downloader).unwrap();
        assert_eq!(outcome.requested, 6);
        assert!(grid.slots().iter().all(|slot| slot.is_placeholder()));

        for _ in 0..6 {
            let delivered = tokio::time::timeout(Duration::from_secs(5), downloader.deliver_next())
                .await
                .unwrap();
            assert_eq!(delivered, Some(DeliveryOutcome::Delivered));
        }

        assert_eq!(grid.loaded_count(), 6);
        assert_eq!(fetcher.calls().len(), 6);
    }

    #[test]
    fn test_cached_items_bind_without_request() {
        let (downloader, fetcher) = downloader(MockImageFetcher::new());
        for i in 0..3 {
            downloader.cache().put(
                format!("{i}.jpg"),
                Arc::new(image::DynamicImage::new_rgba8(5, 5)),
            );
        }
        let mut grid = GalleryGrid::new(items(5), 3, 1);

        let outcome = grid.scroll_to(0, &downloader).unwrap();

        assert_eq!(outcome.from_cache, 3);
        assert_eq!(outcome.requested, 0);
        assert_eq!(grid.loaded_count(), 3);
        assert!(fetcher.calls().is_empty());
        assert!(grid.slots().iter().all(|slot| downloader.requested_url(slot).is_none()));
    }

    #[test]
    fn test_cache_hit_binding_refreshes_recency() {
        let downloader = ThumbnailDownloader::new(
            Arc::new(BoundedImageCache::new(CacheBudget::from_kb(2))),
            Arc::new(MockImageFetcher::new()),
            Arc::new(MockImageDecoder),
        );
        let one_kb = || Arc::new(image::DynamicImage::new_rgba8(16, 16));
        downloader.cache().put("0.jpg".into(), one_kb());
        downloader.cache().put("1.jpg".into(), one_kb());
        let mut grid = GalleryGrid::new(items(1), 1, 1);

        let outcome = grid.scroll_to(0, &downloader).unwrap();
        assert_eq!(outcome.from_cache, 1);

        downloader.cache().put("2.jpg".into(), one_kb());

        assert!(downloader.cache().contains("0.jpg"));
        assert!(!downloader.cache().contains("1.jpg"));
        assert!(downloader.cache().contains("2.jpg"));
    }

    #[test]
    fn test_scroll_rebinds_same_slots_and_clamps() {
        let (downloader, _fetcher) = downloader(MockImageFetcher::new());
        let mut grid = GalleryGrid::new(items(7), 3, 2);
        let first_slot = grid.slots()[0].clone();

        grid.scroll_to(0, &downloader).unwrap();
        assert_eq!(downloader.requested_url(&first_slot).as_deref(), Some("0.jpg"));

        let outcome = grid.scroll_to(10, &downloader).unwrap();

        assert_eq!(outcome.first_row, 1);
        assert_eq!(outcome.requested, 4);
        assert_eq!(outcome.empty, 2);
        assert_eq!(grid.slots()[0], first_slot);
        assert_eq!(downloader.requested_url(&first_slot).as_deref(), Some("3.jpg"));
        assert!(downloader.requested_url(&grid.slots()[5]).is_none());
    }

    #[test]
    fn test_scroll_after_shutdown_fails() {
        let (mut downloader, _fetcher) = downloader(MockImageFetcher::new());
        let mut grid = GalleryGrid::new(items(3), 3, 1);
        downloader.shutdown();

        assert_eq!(grid.scroll_to(0, &downloader), Err(DownloaderError::ShutDown));
    }
}
