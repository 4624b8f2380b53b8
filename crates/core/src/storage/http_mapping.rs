//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! This module provides HTTP status code mappings for [`RepositoryError`] variants,
//! following the Functional Core pattern - pure functions with no side effects.

use super::RepositoryError;

/// User-facing text for a committed write whose cache invalidation failed.
///
/// Key names and store errors only go to the logs.
pub const STALE_CACHE_WARNING: &str =
    "Saved, but some cached data may be stale for a short while";

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists`, `UsernameTaken`, `EmailTaken`, `AlreadyEnrolled`,
///   `CapacityExceeded` -> 409 (Conflict)
/// - `Busy` -> 429 (Too Many Requests)
/// - `CacheInvalidationFailed` -> 200 (OK): the mutation committed
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed`, `TransactionFailed`, `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use campus_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::Busy {
///     resource: "lock:pick:1:2".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 429);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. }
        | RepositoryError::UsernameTaken(_)
        | RepositoryError::EmailTaken(_)
        | RepositoryError::AlreadyEnrolled { .. }
        | RepositoryError::CapacityExceeded { .. } => 409,
        RepositoryError::Busy { .. } => 429,
        RepositoryError::CacheInvalidationFailed { .. } => 200,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::TransactionFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::not_found("Course", 9);
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_conflicts_map_to_409() {
        let errors = [
            RepositoryError::UsernameTaken("alice".to_string()),
            RepositoryError::EmailTaken("a@b.io".to_string()),
            RepositoryError::CapacityExceeded { course_id: 1 },
            RepositoryError::AlreadyEnrolled {
                student_id: 1,
                course_id: 1,
            },
        ];
        for error in errors {
            assert_eq!(repository_error_to_status_code(&error), 409, "{error}");
        }
    }

    #[test]
    fn test_busy_maps_to_429() {
        let error = RepositoryError::Busy {
            resource: "lock:drop:1:1".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 429);
    }

    #[test]
    fn test_invalidation_failure_maps_to_200() {
        let error = RepositoryError::CacheInvalidationFailed {
            keys: vec!["course:all".to_string()],
            reason: "down".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 200);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("database connection timeout".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_internal_failures_map_to_500() {
        assert_eq!(
            repository_error_to_status_code(&RepositoryError::QueryFailed("x".to_string())),
            500
        );
        assert_eq!(
            repository_error_to_status_code(&RepositoryError::TransactionFailed("x".to_string())),
            500
        );
        assert_eq!(
            repository_error_to_status_code(&RepositoryError::Serialization("x".to_string())),
            500
        );
    }

    #[test]
    fn test_invalid_data_maps_to_400() {
        let error = RepositoryError::InvalidData("capacity must be positive".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }
}
