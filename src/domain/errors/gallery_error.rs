//! Gallery listing error types.

use thiserror::Error;

/// Failure to load the gallery listing.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum GalleryError {
    #[error("network error while listing photos: {message}")]
    Network { message: String },

    #[error("photo service returned error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("failed to parse photo listing: {message}")]
    Parse { message: String },

    #[error("no API key configured")]
    MissingApiKey,
}

impl GalleryError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Returns whether retrying later might succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
