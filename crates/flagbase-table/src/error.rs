use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was missing or empty.
    #[error("{0}")]
    InvalidInput(String),

    /// No row matched the requested id.
    #[error("{0}")]
    NotFound(String),

    /// An error originating from the underlying SQLite database.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A feature value could not be encoded to or decoded from its stored text.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification used by the transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller error, not retried.
    InvalidInput,
    /// No row matched the key.
    NotFound,
    /// Store-layer failure.
    Internal,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Sqlite(_) | StoreError::Serialization(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn item_not_found() -> Self {
        StoreError::NotFound("item not found".into())
    }

    pub(crate) fn feature_not_found() -> Self {
        StoreError::NotFound("feature not found".into())
    }
}
