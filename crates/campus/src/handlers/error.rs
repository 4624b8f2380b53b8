use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use campus_core::school::ValidationError;
use campus_core::storage::{
    repository_error_to_status_code, RepositoryError, STALE_CACHE_WARNING,
};
use serde_json::json;

pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            return repository_error_response(repo_error);
        }

        if self.0.downcast_ref::<ValidationError>().is_some() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.0.to_string() })),
            )
                .into_response();
        }

        tracing::error!(error = %self.0, "Unhandled error");
        internal_error(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn repository_error_response(error: &RepositoryError) -> Response {
    let status = StatusCode::from_u16(repository_error_to_status_code(error))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match error {
        // The mutation committed, only the cache may serve stale data.
        RepositoryError::CacheInvalidationFailed { keys, reason } => {
            tracing::warn!(keys = ?keys, reason = %reason, "Responding with stale-cache warning");
            (
                status,
                Json(json!({ "message": "ok", "warning": STALE_CACHE_WARNING })),
            )
                .into_response()
        }
        RepositoryError::Busy { .. } => (
            status,
            Json(json!({ "error": "Resource busy, try again" })),
        )
            .into_response(),
        _ if status.is_server_error() => {
            tracing::error!(error = %error, kind = ?error.kind(), "Storage error");
            internal_error(status)
        }
        _ => (status, Json(json!({ "error": error.to_string() }))).into_response(),
    }
}

fn internal_error(status: StatusCode) -> Response {
    (
        status,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
