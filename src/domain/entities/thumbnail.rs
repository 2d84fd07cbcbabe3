//! Thumbnail request and delivery types.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// A decoded thumbnail shared between the cache, the worker and the UI.
pub type ThumbnailImage = Arc<image::DynamicImage>;

/// Capability required from a display-target handle.
///
/// The downloader never interprets a target; it only hashes it, compares it
/// and hands it back to the listener.
pub trait TargetHandle: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> TargetHandle for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Returns the cache cost of an image in kilobytes (byte size / 1024, rounded down).
#[must_use]
pub fn image_cost_kb(image: &image::DynamicImage) -> usize {
    image.as_bytes().len() / 1024
}

/// A completed download waiting to be handed to the UI context.
#[derive(Debug, Clone)]
pub struct Delivery<T> {
    /// The slot the image was requested for.
    pub target: T,
    /// The URL that was fetched for the target.
    pub url: String,
    /// The decoded image.
    pub image: ThumbnailImage,
}

/// What happened to a delivery once it reached the UI context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The listener received the image.
    Delivered,
    /// The target now wants a different URL (or nothing); the image was dropped.
    Stale,
    /// The request was current but no listener is registered.
    NoListener,
    /// The downloader has been shut down.
    ShutDown,
}

impl DeliveryOutcome {
    /// Returns true if the listener was invoked.
    #[must_use]
    pub const fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivered => write!(f, "delivered"),
            Self::Stale => write!(f, "stale"),
            Self::NoListener => write!(f, "no listener"),
            Self::ShutDown => write!(f, "shut down"),
        }
    }
}
