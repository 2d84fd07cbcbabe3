//! Image fetch error types.

use thiserror::Error;

/// Failure to obtain image bytes for a URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("invalid URL {url:?}")]
    InvalidUrl { url: String },

    #[error("failed to create HTTP client: {message}")]
    Client { message: String },
}

impl FetchError {
    /// Creates transport error.
    #[must_use]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates status error.
    #[must_use]
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates body read error.
    #[must_use]
    pub fn body(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Body {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates client construction error.
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }
}
