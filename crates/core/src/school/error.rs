use thiserror::Error;

/// Errors that can occur when validating incoming requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Username too long (max 64 characters)")]
    UsernameTooLong,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Password must contain only letters and digits")]
    InvalidPasswordFormat,
    #[error("Course name cannot be empty")]
    EmptyCourseName,
    #[error("Course capacity must be positive")]
    InvalidCapacity,
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Task title too long (max 200 characters)")]
    TitleTooLong,
}
