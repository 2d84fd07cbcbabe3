//! Port definition for decoding image bytes.

use crate::domain::errors::DecodeError;

/// Port for turning fetched bytes into a decoded image.
///
/// Decoding is CPU-bound and synchronous; callers move it off async contexts.
pub trait ImageDecoderPort: Send + Sync {
    /// Decodes `bytes` into an image.
    ///
    /// # Errors
    /// Returns error if the bytes are empty, malformed or of an unsupported format.
    fn decode(&self, bytes: &[u8]) -> Result<image::DynamicImage, DecodeError>;
}
