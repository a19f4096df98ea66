use thiserror::Error;

use medsynth_generate::GenerationError;

/// Errors emitted by storage backends and the publisher.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The backend could not be reached or rejected the credentials.
    #[error("storage connection failed: {0}")]
    Connection(String),
    #[error("bucket '{0}' does not exist")]
    NoSuchBucket(String),
    #[error("object '{key}' not found in bucket '{bucket}'")]
    NoSuchObject { bucket: String, key: String },
    #[error("invalid object key '{0}'")]
    InvalidKey(String),
    /// A backend call failed.
    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    pub(crate) fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}
