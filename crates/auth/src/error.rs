use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use campus_core::school::ValidationError;
use campus_core::storage::{
    repository_error_to_status_code, RepositoryError, STALE_CACHE_WARNING,
};
use thiserror::Error;

/// Auth errors for the campus_auth crate.
///
/// This wraps the core `AuthError` and adds the failures of the I/O the
/// functional core cannot do: user lookups, hashing and configuration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (credentials, token checks, etc.)
    #[error(transparent)]
    Core(#[from] campus_core::auth::AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use campus_core::auth::AuthError as CoreError;

        // The write committed. Answer like a success and keep cache details in the logs.
        if let AuthError::Repository(RepositoryError::CacheInvalidationFailed { keys, reason }) =
            &self
        {
            tracing::warn!(keys = ?keys, reason = %reason, "User write left stale cache entries");
            return (
                StatusCode::OK,
                Json(serde_json::json!({ "message": "ok", "warning": STALE_CACHE_WARNING })),
            )
                .into_response();
        }

        let (status, message) = match &self {
            AuthError::Core(core_err) => match core_err {
                CoreError::InvalidCredentials
                | CoreError::MissingToken
                | CoreError::InvalidToken(_)
                | CoreError::TokenExpired
                | CoreError::WrongTokenKind { .. }
                | CoreError::WrongIssuer(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
                CoreError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
                CoreError::Hashing(_) | CoreError::Signing(_) => {
                    tracing::error!("Auth error: {}", self);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            AuthError::Repository(repo_err) => {
                let status = StatusCode::from_u16(repository_error_to_status_code(repo_err))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!(error = %repo_err, "Storage error during auth");
                    (status, "Internal server error".to_string())
                } else if let RepositoryError::Busy { resource } = repo_err {
                    tracing::debug!(resource = %resource, "Auth request hit a held lock");
                    (status, "Resource busy, try again".to_string())
                } else {
                    (status, repo_err.to_string())
                }
            }
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AuthError::Config(_) => {
                tracing::error!("Config error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
