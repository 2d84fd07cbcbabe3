//! Presentation layer: the headless gallery view.

/// Slot grid, slot handles and the gallery driver.
pub mod gallery;

pub use gallery::{GalleryApp, GalleryGrid, GallerySummary, SlotHandle, ThumbnailSlot};
