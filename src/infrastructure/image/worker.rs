//! Serial thumbnail download worker.
//!
//! One worker processes one target at a time. For each target it looks up
//! the URL the request table currently names, serves it from the cache or
//! fetches and decodes it, and posts the result to the delivery channel.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::domain::entities::{Delivery, TargetHandle, ThumbnailImage};
use crate::domain::errors::{DecodeError, ThumbnailError};
use crate::domain::ports::{ImageCachePort, ImageDecoderPort, ImageFetcherPort};

use super::delivery::DeliverySender;
use super::request_table::RequestTable;

/// Message sent from the facade to the worker.
#[derive(Debug)]
pub enum WorkerCommand<T> {
    /// Process the current request for this target.
    Fetch(T),
    /// Drop every target queued before this command.
    ClearPending,
}

/// State owned by the background worker task.
pub struct DownloadWorker<T> {
    table: Arc<RequestTable<T>>,
    cache: Arc<dyn ImageCachePort>,
    fetcher: Arc<dyn ImageFetcherPort>,
    decoder: Arc<dyn ImageDecoderPort>,
    delivery: DeliverySender<T>,
    commands: mpsc::UnboundedReceiver<WorkerCommand<T>>,
    queue: VecDeque<T>,
}

impl<T> std::fmt::Debug for DownloadWorker<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadWorker")
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl<T: TargetHandle> DownloadWorker<T> {
    /// Creates a worker reading commands from `commands`.
    #[must_use]
    pub fn new(
        table: Arc<RequestTable<T>>,
        cache: Arc<dyn ImageCachePort>,
        fetcher: Arc<dyn ImageFetcherPort>,
        decoder: Arc<dyn ImageDecoderPort>,
        delivery: DeliverySender<T>,
        commands: mpsc::UnboundedReceiver<WorkerCommand<T>>,
    ) -> Self {
        Self {
            table,
            cache,
            fetcher,
            decoder,
            delivery,
            commands,
            queue: VecDeque::new(),
        }
    }

    /// Runs until the command channel closes or the UI side stops listening.
    pub async fn run(mut self) {
        debug!("Thumbnail worker loop started");

        loop {
            if self.delivery.is_closed() {
                debug!("Delivery channel closed, stopping worker");
                break;
            }

            self.drain_ready_commands();

            if let Some(target) = self.queue.pop_front() {
                self.process(target).await;
                continue;
            }

            match self.commands.recv().await {
                Some(command) => self.apply(command),
                None => break,
            }
        }

        debug!(dropped = self.queue.len(), "Thumbnail worker loop stopped");
    }

    /// Moves every command that is already waiting into the local queue, so a
    /// `ClearPending` only ever affects targets enqueued before it.
    fn drain_ready_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: WorkerCommand<T>) {
        match command {
            WorkerCommand::Fetch(target) => self.queue.push_back(target),
            WorkerCommand::ClearPending => {
                let dropped = self.queue.len();
                self.queue.clear();
                if dropped > 0 {
                    debug!(count = dropped, "Cleared pending thumbnail requests");
                }
            }
        }
    }

    /// Handles one dequeued target. Failures are logged and swallowed.
    async fn process(&self, target: T) {
        let Some(url) = self.table.get(&target) else {
            trace!(handle = ?target, "No current request for target, skipping");
            return;
        };

        let image = if let Some(image) = self.cache.get(&url) {
            trace!(handle = ?target, url = %url, "Serving thumbnail from memory cache");
            image
        } else {
            match self.download(&url).await {
                Ok(image) => {
                    self.cache.put_if_absent(url.clone(), image.clone());
                    image
                }
                Err(e) => {
                    warn!(
                        handle = ?target,
                        url = %url,
                        kind = e.kind(),
                        error = %e,
                        "Thumbnail download failed"
                    );
                    return;
                }
            }
        };

        if !self.delivery.post(Delivery { target, url, image }) {
            debug!("Delivery channel closed, dropping thumbnail");
        }
    }

    /// Fetches and decodes `url`. Decoding runs on the blocking pool.
    async fn download(&self, url: &str) -> Result<ThumbnailImage, ThumbnailError> {
        debug!(url = %url, "Downloading thumbnail");

        let bytes = self.fetcher.fetch_bytes(url).await?;

        let decoder = self.decoder.clone();
        let decoded = tokio::task::spawn_blocking(move || decoder.decode(&bytes))
            .await
            .map_err(|e| DecodeError::task_failed(e.to_string()))??;

        trace!(
            url = %url,
            width = decoded.width(),
            height = decoded.height(),
            "Thumbnail decoded"
        );

        Ok(Arc::new(decoded))
    }
}
