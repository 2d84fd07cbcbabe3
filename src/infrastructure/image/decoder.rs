//! `image` crate adapter for decoding thumbnail bytes.

use tracing::trace;

use crate::domain::errors::DecodeError;
use crate::domain::ports::ImageDecoderPort;

/// Decodes PNG, JPEG and WebP bytes, optionally downscaling wide images.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder {
    max_width: Option<u32>,
}

impl ImageCrateDecoder {
    /// Creates a decoder that keeps images at their original size.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_width: None }
    }

    /// Downscales images wider than `max_width`, preserving aspect ratio.
    #[must_use]
    pub const fn with_max_width(max_width: Option<u32>) -> Self {
        Self { max_width }
    }
}

impl ImageDecoderPort for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<image::DynamicImage, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        let img = image::load_from_memory(bytes).map_err(|e| DecodeError::malformed(e.to_string()))?;

        match self.max_width {
            Some(max) if max > 0 && img.width() > max => {
                trace!(from = img.width(), to = max, "Downscaling thumbnail");
                Ok(img.thumbnail(max, img.height()))
            }
            _ => Ok(img),
        }
    }
}
