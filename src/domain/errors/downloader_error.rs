//! Thumbnail downloader lifecycle errors.

use thiserror::Error;

use super::{DecodeError, FetchError};

/// Errors returned by the downloader facade.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DownloaderError {
    /// The downloader has been shut down and accepts no more work.
    #[error("thumbnail downloader has been shut down")]
    ShutDown,

    /// `start` was called on a running downloader.
    #[error("thumbnail downloader is already running")]
    AlreadyRunning,

    /// `start` was called outside a tokio runtime.
    #[error("thumbnail downloader must be started inside a tokio runtime")]
    NoRuntime,
}

/// Failure of a single queued thumbnail; never leaves the worker.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThumbnailError {
    /// Bytes could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ThumbnailError {
    /// Short label for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Decode(_) => "decode",
        }
    }
}
