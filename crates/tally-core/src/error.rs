use thiserror::Error;

/// Errors raised while constructing core domain values.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid slug: {0}")]
    InvalidSlug(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage i/o failed: {0}")]
    Io(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors returned by the like and view counters.
#[derive(Debug, Clone, Error)]
pub enum CounterError {
    #[error("invalid slug: {0}")]
    InvalidSlug(String),
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<CoreError> for CounterError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidSlug(message) => Self::InvalidSlug(message),
        }
    }
}

impl From<StorageError> for CounterError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value.to_string())
    }
}
