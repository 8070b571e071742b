use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StudioError {
    /// Rejected before any network call (empty prompt, missing upload).
    #[error("{0}")]
    Validation(String),

    /// The remote call failed after all retries. Carries a user-facing message.
    #[error("{0}")]
    Generation(String),

    #[error("No image data was found in the API response.")]
    NoImageData,

    /// Malformed image data URI.
    #[error("Invalid image data: {0}")]
    Format(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::Serialization(e.to_string())
    }
}

/// Failure of a durable-storage write, split by whether pruning can help.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage quota exceeded while writing {bytes} bytes")]
    QuotaExceeded { bytes: usize },

    #[error("{0}")]
    Other(String),
}

impl StorageError {
    pub fn is_capacity(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}
