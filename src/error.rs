use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index {index} out of range for bucket of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BoardError {
    /// Returns true for contract violations raised by the ordering core.
    ///
    /// These come from callers building a move out of stale or unvalidated
    /// UI state and are not recoverable at runtime.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::IndexOutOfRange { .. } | Self::ItemNotFound(_)
        )
    }
}
