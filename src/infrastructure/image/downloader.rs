//! Thumbnail downloader facade.
//!
//! Owned by the UI context. Requests are recorded in the request table and
//! queued for the background worker; finished thumbnails come back through
//! the delivery channel and reach the listener only from [`ThumbnailDownloader::dispatch`],
//! which the UI context drives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use crate::domain::entities::{Delivery, DeliveryOutcome, TargetHandle, ThumbnailImage};
use crate::domain::errors::{DownloaderError, FetchError};
use crate::domain::ports::{ImageCachePort, ImageDecoderPort, ImageFetcherPort, ThumbnailListener};
use crate::infrastructure::config::DownloaderConfig;

use super::decoder::ImageCrateDecoder;
use super::delivery::{DeliveryReceiver, delivery_channel};
use super::http_fetcher::HttpImageFetcher;
use super::memory_cache::{BoundedImageCache, CacheBudget, CacheStats};
use super::request_table::RequestTable;
use super::worker::{DownloadWorker, WorkerCommand};

/// Asynchronous, cancellable thumbnail downloader keyed by display target.
pub struct ThumbnailDownloader<T: TargetHandle> {
    table: Arc<RequestTable<T>>,
    cache: Arc<BoundedImageCache>,
    command_tx: mpsc::UnboundedSender<WorkerCommand<T>>,
    worker: Option<DownloadWorker<T>>,
    worker_handle: Option<JoinHandle<()>>,
    deliveries: Option<DeliveryReceiver<T>>,
    listener: Option<Box<dyn ThumbnailListener<T>>>,
    running: Arc<AtomicBool>,
    shut_down: bool,
}

impl<T: TargetHandle> std::fmt::Debug for ThumbnailDownloader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailDownloader")
            .field("cache", &self.cache)
            .field("running", &self.is_running())
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}

impl<T: TargetHandle> ThumbnailDownloader<T> {
    /// Creates a stopped downloader around the given collaborators.
    #[must_use]
    pub fn new(
        cache: Arc<BoundedImageCache>,
        fetcher: Arc<dyn ImageFetcherPort>,
        decoder: Arc<dyn ImageDecoderPort>,
    ) -> Self {
        let table = Arc::new(RequestTable::new());
        let (delivery_tx, deliveries) = delivery_channel(table.clone());
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let worker = DownloadWorker::new(
            table.clone(),
            cache.clone(),
            fetcher,
            decoder,
            delivery_tx,
            command_rx,
        );

        Self {
            table,
            cache,
            command_tx,
            worker: Some(worker),
            worker_handle: None,
            deliveries: Some(deliveries),
            listener: None,
            running: Arc::new(AtomicBool::new(false)),
            shut_down: false,
        }
    }

    /// Creates a downloader backed by HTTP and the `image` crate.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &DownloaderConfig) -> Result<Self, FetchError> {
        let budget = config.cache_budget_kb.map_or_else(
            || CacheBudget::from_available_memory(config.memory_fraction_divisor),
            CacheBudget::from_kb,
        );
        let fetcher = HttpImageFetcher::new(
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )?;
        let decoder = ImageCrateDecoder::with_max_width(config.max_thumbnail_width);

        Ok(Self::new(
            Arc::new(BoundedImageCache::new(budget)),
            Arc::new(fetcher),
            Arc::new(decoder),
        ))
    }

    /// Starts the background worker on the current tokio runtime.
    /// Requests made before `start` are processed once it runs.
    ///
    /// # Errors
    /// Returns error if already started, shut down, or called outside a runtime.
    pub fn start(&mut self) -> Result<(), DownloaderError> {
        if self.shut_down {
            return Err(DownloaderError::ShutDown);
        }
        if self.worker.is_none() {
            return Err(DownloaderError::AlreadyRunning);
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| DownloaderError::NoRuntime)?;
        let Some(worker) = self.worker.take() else {
            return Err(DownloaderError::AlreadyRunning);
        };

        let running = self.running.clone();
        running.store(true, Ordering::SeqCst);

        self.worker_handle = Some(runtime.spawn(async move {
            let result = std::panic::AssertUnwindSafe(worker.run()).catch_unwind().await;

            if let Err(panic_info) = result {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    (*s).to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!(panic = %panic_msg, "Thumbnail worker panicked");
            }

            running.store(false, Ordering::SeqCst);
        }));

        info!(budget_kb = self.cache.budget_kb(), "Thumbnail downloader started");
        Ok(())
    }

    /// Registers the listener that receives current thumbnails.
    pub fn set_listener(&mut self, listener: impl ThumbnailListener<T> + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Makes `url` the only thumbnail wanted for `target` and queues the target.
    ///
    /// # Errors
    /// Returns [`DownloaderError::ShutDown`] after [`shutdown`](Self::shutdown)
    /// or if the worker has died.
    pub fn request_thumbnail(
        &self,
        target: T,
        url: impl Into<String>,
    ) -> Result<(), DownloaderError> {
        if self.shut_down {
            return Err(DownloaderError::ShutDown);
        }

        let url = url.into();
        trace!(handle = ?target, url = %url, "Queueing thumbnail");
        self.table.insert(target.clone(), url);
        self.command_tx
            .send(WorkerCommand::Fetch(target))
            .map_err(|_| DownloaderError::ShutDown)
    }

    /// Drops every queued request the worker has not started yet.
    ///
    /// The request table is left intact, so in-flight downloads still pass
    /// their delivery-time check if their target has not been re-requested.
    pub fn clear_pending(&self) {
        if self.shut_down {
            return;
        }
        if self.command_tx.send(WorkerCommand::ClearPending).is_err() {
            debug!("Worker gone, nothing to clear");
        }
    }

    /// Returns a cached thumbnail and marks it as recently used.
    ///
    /// This is the lookup for binding a visible target; use [`peek`](Self::peek)
    /// for inspection that must not affect eviction order.
    #[must_use]
    pub fn cached(&self, url: &str) -> Option<ThumbnailImage> {
        self.cache.get(url)
    }

    /// Returns a cached thumbnail without touching LRU order.
    #[must_use]
    pub fn peek(&self, url: &str) -> Option<ThumbnailImage> {
        self.cache.peek(url)
    }

    /// Returns the URL currently wanted for `target`.
    #[must_use]
    pub fn requested_url(&self, target: &T) -> Option<String> {
        self.table.get(target)
    }

    /// Forgets the request for `target`; a result still in flight for it
    /// will be dropped as stale.
    pub fn forget(&self, target: &T) {
        if let Some(url) = self.table.remove(target) {
            trace!(handle = ?target, url = %url, "Forgot thumbnail request");
        }
    }

    /// Returns the shared image cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<BoundedImageCache> {
        &self.cache
    }

    /// Returns memory cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Returns true while the worker task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Waits for the next delivery posted by the worker.
    /// Returns `None` after shutdown or once the worker is gone.
    pub async fn recv_delivery(&mut self) -> Option<Delivery<T>> {
        match self.deliveries.as_mut() {
            Some(deliveries) => deliveries.recv().await,
            None => None,
        }
    }

    /// Runs the delivery-time staleness check and invokes the listener if
    /// `target` still wants exactly this URL.
    pub fn dispatch(&mut self, delivery: Delivery<T>) -> DeliveryOutcome {
        if self.shut_down {
            return DeliveryOutcome::ShutDown;
        }
        let Some(deliveries) = self.deliveries.as_ref() else {
            return DeliveryOutcome::ShutDown;
        };
        deliveries.dispatch(delivery, self.listener.as_deref_mut())
    }

    /// Receives and dispatches one delivery.
    /// Returns `None` after shutdown or once the worker is gone.
    pub async fn deliver_next(&mut self) -> Option<DeliveryOutcome> {
        let delivery = self.recv_delivery().await?;
        Some(self.dispatch(delivery))
    }

    /// Dispatches every delivery that is already waiting, without blocking.
    /// Returns how many reached the listener.
    pub fn deliver_ready(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(delivery) = self.deliveries.as_mut().and_then(DeliveryReceiver::try_recv) {
            if self.dispatch(delivery).is_delivered() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Stops the worker and guarantees no listener call happens afterwards.
    /// Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.worker_handle.take() {
            handle.abort();
        }
        self.worker = None;
        if let Some(mut deliveries) = self.deliveries.take() {
            deliveries.close();
        }
        self.listener = None;

        info!("Thumbnail downloader shut down");
    }
}

impl<T: TargetHandle> Drop for ThumbnailDownloader<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
