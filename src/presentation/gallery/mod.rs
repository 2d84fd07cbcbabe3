//! Headless gallery: a recycled slot grid driven by the thumbnail downloader.

pub mod app;
pub mod grid;
pub mod slot;

pub use app::{GalleryApp, GallerySummary};
pub use grid::{GalleryGrid, ScrollOutcome};
pub use slot::{SlotHandle, ThumbnailSlot};
