//! Domain entity definitions.

mod gallery_item;
mod thumbnail;

pub use gallery_item::GalleryItem;
pub use thumbnail::{
    Delivery, DeliveryOutcome, TargetHandle, ThumbnailImage, image_cost_kb,
};
