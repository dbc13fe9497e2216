//! Orchestrator-role handlers.
//!
//! The privileged health-check endpoint performs an unrestricted
//! server-side fetch and has no ticket or cooldown check of its own: it
//! trusts the worker's diagnostics gate completely. That asymmetry is a
//! property of the system, not an oversight — do not add an allow-list
//! here without redesigning the whole gate.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{OrchestratorState, error_response};

/// GET /health — plain liveness text.
pub async fn health() -> &'static str {
    "ok"
}

/// Body of a privileged health-check request.
#[derive(Debug, Deserialize)]
pub struct HealthCheckRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// POST /admin/health-check — fetch the caller-supplied URL, no allow-list.
///
/// Reachable (2xx within the timeout) answers 204 with an empty body.
/// Any failure — connection error, timeout, or non-2xx — answers 502
/// carrying the protected secret: failure is the disclosure channel.
pub async fn health_check(
    State(state): State<OrchestratorState>,
    Json(req): Json<HealthCheckRequest>,
) -> Response {
    let Some(target_url) = req.url.filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "missing url");
    };

    debug!(url = %target_url, "privileged health check");

    let fetched = state
        .http
        .get(&target_url)
        .timeout(state.settings.health_check_timeout)
        .send()
        .await;

    match fetched {
        Ok(response) if response.status().is_success() => {
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(response) => {
            warn!(url = %target_url, status = %response.status(), "health check target unhealthy");
            (StatusCode::BAD_GATEWAY, state.settings.secret.clone()).into_response()
        }
        Err(e) => {
            warn!(url = %target_url, error = %e, "health check fetch failed");
            (StatusCode::BAD_GATEWAY, state.settings.secret.clone()).into_response()
        }
    }
}
