use thiserror::Error;

/// Errors raised by the store gateway.
///
/// Missing documents are never an error here: lookups return `Option` and
/// deletes report how many documents they removed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached (pool exhausted, server selection
    /// failed, network down).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The request-scoped deadline expired before the store answered.
    #[error("store deadline exceeded")]
    Timeout,

    /// The backend answered but rejected the operation.
    #[error("store operation failed: {0}")]
    OperationFailed(String),

    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        StoreError::Unavailable(msg.into())
    }

    pub fn operation_failed(msg: impl Into<String>) -> Self {
        StoreError::OperationFailed(msg.into())
    }

    /// True when the failure is about reaching the store rather than about
    /// the operation itself.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout)
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match e.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. } => StoreError::Unavailable(e.to_string()),
            _ => StoreError::OperationFailed(e.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
