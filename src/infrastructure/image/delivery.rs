//! Delivery hop from the download worker back to the UI context.
//!
//! The worker posts [`Delivery`] values; the UI context receives them and
//! dispatches each one after re-checking the request table, so the listener
//! only ever runs on the receiving side.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

use crate::domain::entities::{Delivery, DeliveryOutcome, TargetHandle};
use crate::domain::ports::ThumbnailListener;

use super::request_table::RequestTable;

/// Creates a connected sender/receiver pair validating against `table`.
#[must_use]
pub fn delivery_channel<T: TargetHandle>(
    table: Arc<RequestTable<T>>,
) -> (DeliverySender<T>, DeliveryReceiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DeliverySender { tx }, DeliveryReceiver { rx, table })
}

/// Worker-side handle used to post completed downloads.
#[derive(Debug, Clone)]
pub struct DeliverySender<T> {
    tx: mpsc::UnboundedSender<Delivery<T>>,
}

impl<T: TargetHandle> DeliverySender<T> {
    /// Posts a delivery task. Returns false if the UI side is gone.
    pub fn post(&self, delivery: Delivery<T>) -> bool {
        self.tx.send(delivery).is_ok()
    }

    /// Returns true once the receiving side has been closed or dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// UI-side end of the delivery hop.
#[derive(Debug)]
pub struct DeliveryReceiver<T> {
    rx: mpsc::UnboundedReceiver<Delivery<T>>,
    table: Arc<RequestTable<T>>,
}

impl<T: TargetHandle> DeliveryReceiver<T> {
    /// Waits for the next posted delivery.
    /// Returns `None` once every sender is gone or the receiver was closed.
    pub async fn recv(&mut self) -> Option<Delivery<T>> {
        self.rx.recv().await
    }

    /// Returns an already-posted delivery without waiting.
    pub fn try_recv(&mut self) -> Option<Delivery<T>> {
        self.rx.try_recv().ok()
    }

    /// Runs the delivery-time staleness check and, if the request is still
    /// current, hands the image to `listener`.
    pub fn dispatch(
        &self,
        delivery: Delivery<T>,
        listener: Option<&mut (dyn ThumbnailListener<T> + '_)>,
    ) -> DeliveryOutcome {
        let Delivery { target, url, image } = delivery;

        if !self.table.is_current(&target, &url) {
            trace!(handle = ?target, url = %url, "Dropping stale thumbnail");
            return DeliveryOutcome::Stale;
        }

        match listener {
            Some(listener) => {
                listener.on_thumbnail_ready(&target, image);
                DeliveryOutcome::Delivered
            }
            None => {
                trace!(handle = ?target, url = %url, "Thumbnail ready but no listener registered");
                DeliveryOutcome::NoListener
            }
        }
    }

    /// Stops accepting deliveries; pending ones are discarded.
    pub fn close(&mut self) {
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }
}
