//! Listener invoked on the UI context when a thumbnail is ready.

use crate::domain::entities::ThumbnailImage;

/// Receives thumbnails for targets whose request is still current.
///
/// Only ever called from the context that drives the downloader's delivery
/// loop, so implementations may mutate UI state freely. Keep it cheap.
pub trait ThumbnailListener<T>: Send {
    /// Called with the target and its decoded image.
    fn on_thumbnail_ready(&mut self, target: &T, image: ThumbnailImage);
}

impl<T, F> ThumbnailListener<T> for F
where
    F: FnMut(&T, ThumbnailImage) + Send,
{
    fn on_thumbnail_ready(&mut self, target: &T, image: ThumbnailImage) {
        self(target, image);
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Listener recording every (target, width, height) it receives.
    pub struct RecordingListener<T> {
        received: Arc<Mutex<Vec<(T, u32, u32)>>>,
    }

    impl<T> RecordingListener<T> {
        /// Creates a listener and the shared log it appends to.
        pub fn new() -> (Self, Arc<Mutex<Vec<(T, u32, u32)>>>) {
            let received = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    received: received.clone(),
                },
                received,
            )
        }
    }

    impl<T: Clone + Send> ThumbnailListener<T> for RecordingListener<T> {
        fn on_thumbnail_ready(&mut self, target: &T, image: ThumbnailImage) {
            self.received
                .lock()
                .push((target.clone(), image.width(), image.height()));
        }
    }
}
