//! Worker-role handlers: registration, cue relay, diagnostics.

use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{info, warn};

use stagehand_relay::{forward_diagnostics, parse_cue_target, send_cue};

use crate::cookies::{ticket_cookie, ticket_from_cookies};
use crate::{WorkerState, error_response, mirrored_response};

/// Header that switches the ticket source from cookie to request body.
const CUE_RELAY_HEADER: &str = "x-cue-relay";

/// GET /admin/api/health — liveness probe target.
pub async fn health() -> &'static str {
    "ok"
}

/// POST /register — issue a ticket and seed the admin cooldown.
pub async fn register(State(state): State<WorkerState>) -> Response {
    let ticket = state.tickets.issue();
    state.cooldown.mark(&ticket);
    info!("ticket issued and placed in admin cooldown");

    (
        [(header::SET_COOKIE, ticket_cookie(&ticket))],
        Json(serde_json::json!({ "ticket": ticket })),
    )
        .into_response()
}

/// Body of a cue relay request.
#[derive(Debug, Deserialize)]
pub struct CueRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub body: Option<serde_json::Value>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub ticket: Option<String>,
}

/// POST /user/cue-test — ticket-gated relay to the allow-listed host.
pub async fn cue_test(
    State(state): State<WorkerState>,
    headers: HeaderMap,
    Json(req): Json<CueRequest>,
) -> Response {
    let ticket = ticket_from_cookies(&headers).or_else(|| req.ticket.clone());
    if !state.tickets.validate(ticket.as_deref().unwrap_or_default()) {
        return error_response(StatusCode::FORBIDDEN, "invalid ticket");
    }

    let Some(target) = req
        .url
        .as_deref()
        .and_then(|raw| parse_cue_target(raw, &state.settings.allowed_cue_host))
    else {
        return error_response(StatusCode::FORBIDDEN, "cue target not allowed");
    };

    let method = req.method.as_deref().unwrap_or("GET");
    let cue_headers = req.headers.unwrap_or_default();

    match send_cue(
        &state.http,
        target,
        method,
        &cue_headers,
        req.body.as_ref(),
        state.settings.cue_timeout,
    )
    .await
    {
        Ok(relayed) => mirrored_response(relayed),
        Err(e) => {
            warn!(error = %e, "cue relay failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "cue relay failed")
        }
    }
}

/// Body of a diagnostics request.
#[derive(Debug, Deserialize)]
pub struct DiagnosticsRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ticket: Option<String>,
}

/// POST /admin/diagnostics — forward a privileged health check.
///
/// Gate order is load-bearing and short-circuits on the first failure:
/// ticket present, ticket valid, ticket not in cooldown, url present.
/// Only then is the target forwarded to the orchestrator's privileged
/// endpoint, whose response is mirrored verbatim.
pub async fn diagnostics(
    State(state): State<WorkerState>,
    headers: HeaderMap,
    Json(req): Json<DiagnosticsRequest>,
) -> Response {
    let via_relay = headers
        .get(CUE_RELAY_HEADER)
        .and_then(|v| v.to_str().ok())
        == Some("1");
    let ticket = if via_relay {
        req.ticket.clone()
    } else {
        ticket_from_cookies(&headers)
    };

    let Some(ticket) = ticket.filter(|t| !t.is_empty()) else {
        return error_response(StatusCode::FORBIDDEN, "ticket required");
    };
    if !state.tickets.validate(&ticket) {
        return error_response(StatusCode::FORBIDDEN, "invalid ticket");
    }
    if state.cooldown.is_in_cooldown(&ticket) {
        return error_response(StatusCode::FORBIDDEN, "admin cooldown active");
    }

    let Some(target_url) = req.url.filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "missing url");
    };

    match forward_diagnostics(
        &state.http,
        &state.settings.orchestrator_url,
        &target_url,
        state.settings.cue_timeout,
    )
    .await
    {
        Ok(relayed) => mirrored_response(relayed),
        Err(e) => {
            warn!(error = %e, "diagnostics forward failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "diagnostics failed")
        }
    }
}
