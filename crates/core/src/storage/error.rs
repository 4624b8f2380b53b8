use thiserror::Error;

/// Caller-facing classification of a failed operation.
///
/// `Busy` is retryable by the end user. Every other kind is terminal for
/// the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The entity does not exist (possibly answered from a negative cache entry).
    NotFound,
    /// A write-scoped lock is held by another request.
    Busy,
    /// A cached document could not be decoded.
    Corrupt,
    /// The mutation committed but affected cache keys could not be deleted.
    CacheInvalidationFailed,
    /// The cache or the system of record could not be reached.
    StoreUnavailable,
    /// The system-of-record transaction was rejected or rolled back.
    TransactionFailed,
}

impl ErrorKind {
    /// Returns true if the end user may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Busy)
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Username already taken: {0}")]
    UsernameTaken(String),
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    #[error("Course {course_id} is full")]
    CapacityExceeded { course_id: i64 },
    #[error("Student {student_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled { student_id: i64, course_id: i64 },
    #[error("Resource busy, try again: {resource}")]
    Busy { resource: String },
    #[error("Committed, but cache invalidation failed for [{}]: {reason}", keys.join(", "))]
    CacheInvalidationFailed { keys: Vec<String>, reason: String },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Classifies this error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::NotFound { .. } => ErrorKind::NotFound,
            RepositoryError::Busy { .. } => ErrorKind::Busy,
            RepositoryError::CacheInvalidationFailed { .. } => ErrorKind::CacheInvalidationFailed,
            RepositoryError::ConnectionFailed(_) => ErrorKind::StoreUnavailable,
            RepositoryError::Serialization(_) => ErrorKind::Corrupt,
            RepositoryError::AlreadyExists { .. }
            | RepositoryError::UsernameTaken(_)
            | RepositoryError::EmailTaken(_)
            | RepositoryError::CapacityExceeded { .. }
            | RepositoryError::AlreadyEnrolled { .. }
            | RepositoryError::QueryFailed(_)
            | RepositoryError::TransactionFailed(_)
            | RepositoryError::InvalidData(_) => ErrorKind::TransactionFailed,
        }
    }

    /// Shorthand for a `NotFound` error on an integer-keyed entity.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
