use thiserror::Error;

use crate::storage::ErrorKind;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Cache key not found: {0}")]
    NotFound(String),
    #[error("Corrupt cache entry at {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Lock {0} is not held by this token")]
    LockNotHeld(String),
}

impl CacheError {
    /// Classifies this error in the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CacheError::NotFound(_) => ErrorKind::NotFound,
            CacheError::Corrupt { .. } => ErrorKind::Corrupt,
            CacheError::ConnectionFailed(_)
            | CacheError::OperationFailed(_)
            | CacheError::Serialization(_)
            | CacheError::LockNotHeld(_) => ErrorKind::StoreUnavailable,
        }
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
