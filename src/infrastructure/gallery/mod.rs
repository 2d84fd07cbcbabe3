//! Photo listing adapters.

mod dto;
pub mod flickr;

pub use flickr::FlickrGalleryClient;
