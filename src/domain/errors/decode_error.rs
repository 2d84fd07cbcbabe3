//! Image decode error types.

use thiserror::Error;

/// Failure to turn fetched bytes into an image.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum DecodeError {
    #[error("no image data")]
    Empty,

    #[error("unsupported or malformed image: {message}")]
    Malformed { message: String },

    #[error("decoder task failed: {message}")]
    TaskFailed { message: String },
}

impl DecodeError {
    /// Creates malformed image error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates decoder task error.
    #[must_use]
    pub fn task_failed(message: impl Into<String>) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }
}
