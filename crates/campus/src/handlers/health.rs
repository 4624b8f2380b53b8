//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/readyz` - Readiness probe that also reports cache reachability

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

const PROBE_KEY: &str = "probe:readyz";

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub ready: bool,
    /// `ok` or `degraded`. Requests are still served when degraded.
    pub cache: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /readyz - Readiness probe.
///
/// An unreachable cache does not make the service unready: reads fall back
/// to the system of record. The cache state is reported for operators.
#[axum::debug_handler]
pub async fn readyz(State(state): State<AppState>) -> Json<Readiness> {
    match state.cache.exists(PROBE_KEY).await {
        Ok(_) => Json(Readiness {
            ready: true,
            cache: "ok",
            error: None,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Cache probe failed");
            Json(Readiness {
                ready: true,
                cache: "degraded",
                error: Some(e.to_string()),
            })
        }
    }
}
