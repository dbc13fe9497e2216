//! stagehand-api — HTTP surface for both daemon roles.
//!
//! # Routes
//!
//! Worker:
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/register` | Issue a ticket, set the session cookie, seed cooldown |
//! | POST | `/user/cue-test` | Ticket-gated cue relay to the allow-listed host |
//! | GET | `/admin/api/health` | Liveness probe target for the orchestrator |
//! | POST | `/admin/diagnostics` | Ticket-and-cooldown-gated diagnostics forward |
//!
//! Orchestrator:
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/health` | Plain liveness text |
//! | POST | `/admin/health-check` | Privileged unrestricted fetch (trusts its caller) |

pub mod cookies;
pub mod orchestrator;
pub mod worker;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;

use stage_core::Settings;
use stagehand_relay::RelayedResponse;
use stagehand_tickets::{CooldownCache, TicketStore};

/// Shared state for worker handlers.
#[derive(Clone)]
pub struct WorkerState {
    pub tickets: TicketStore,
    pub cooldown: CooldownCache,
    pub http: reqwest::Client,
    pub settings: Arc<Settings>,
}

impl WorkerState {
    /// Assemble worker state from runtime settings.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            tickets: TicketStore::new(settings.ticket_ttl),
            cooldown: CooldownCache::new(),
            http: reqwest::Client::new(),
            settings,
        }
    }
}

/// Shared state for orchestrator handlers.
#[derive(Clone)]
pub struct OrchestratorState {
    pub http: reqwest::Client,
    pub settings: Arc<Settings>,
}

impl OrchestratorState {
    /// Assemble orchestrator state from runtime settings.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

/// Build the worker-role router.
pub fn worker_router(state: WorkerState) -> Router {
    Router::new()
        .route("/register", post(worker::register))
        .route("/user/cue-test", post(worker::cue_test))
        .route("/admin/api/health", get(worker::health))
        .route("/admin/diagnostics", post(worker::diagnostics))
        .with_state(state)
}

/// Build the orchestrator-role router.
pub fn orchestrator_router(state: OrchestratorState) -> Router {
    Router::new()
        .route("/health", get(orchestrator::health))
        .route("/admin/health-check", post(orchestrator::health_check))
        .with_state(state)
}

/// Minimal machine-readable rejection body.
pub(crate) fn error_response(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({ "error": msg }))).into_response()
}

/// Mirror a relayed downstream response back to the caller unchanged.
pub(crate) fn mirrored_response(relayed: RelayedResponse) -> Response {
    let status = StatusCode::from_u16(relayed.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (
        status,
        [(axum::http::header::CONTENT_TYPE, relayed.content_type)],
        relayed.body,
    )
        .into_response()
}
