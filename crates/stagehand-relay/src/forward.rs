//! Outbound request forwarding and response mirroring.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use thiserror::Error;
use tracing::debug;

/// Errors on a forwarding path.
///
/// Carried sources are for logs only; the API layer replaces them with a
/// generic failure message before anything reaches the client.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("unsupported method `{0}`")]
    Method(String),

    #[error("failed to serialize request body")]
    Body(#[source] serde_json::Error),

    #[error("relay request failed")]
    Transport(#[source] reqwest::Error),
}

/// A downstream response mirrored back to the caller verbatim.
#[derive(Debug)]
pub struct RelayedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Bytes,
}

/// Forward a caller-shaped cue to an already-validated target.
///
/// Propagates the method (default GET at the call site), the caller's
/// headers, and a JSON-serialized body. When a body is present and the
/// caller supplied no content-type, it defaults to `application/json`.
pub async fn send_cue(
    client: &Client,
    target: Url,
    method: &str,
    headers: &HashMap<String, String>,
    body: Option<&serde_json::Value>,
    timeout: Duration,
) -> Result<RelayedResponse, RelayError> {
    let method = Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|_| RelayError::Method(method.to_string()))?;

    debug!(%target, %method, "forwarding cue");

    let mut request = client.request(method, target).timeout(timeout);

    let mut has_content_type = false;
    for (name, value) in headers {
        if name.eq_ignore_ascii_case("content-type") {
            has_content_type = true;
        }
        request = request.header(name.as_str(), value.as_str());
    }

    if let Some(payload) = body {
        if !has_content_type {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        request = request.body(serde_json::to_vec(payload).map_err(RelayError::Body)?);
    }

    mirror(request.send().await.map_err(RelayError::Transport)?).await
}

/// Forward a diagnostics target to the orchestrator's privileged
/// health-check endpoint and mirror whatever it answers.
pub async fn forward_diagnostics(
    client: &Client,
    orchestrator_url: &str,
    target_url: &str,
    timeout: Duration,
) -> Result<RelayedResponse, RelayError> {
    debug!(%orchestrator_url, "forwarding diagnostics request");

    let response = client
        .post(orchestrator_url)
        .timeout(timeout)
        .json(&serde_json::json!({ "url": target_url }))
        .send()
        .await
        .map_err(RelayError::Transport)?;

    mirror(response).await
}

/// Capture status, content-type, and raw body from a downstream response.
async fn mirror(response: reqwest::Response) -> Result<RelayedResponse, RelayError> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/plain")
        .to_string();
    let body = response.bytes().await.map_err(RelayError::Transport)?;

    Ok(RelayedResponse {
        status,
        content_type,
        body,
    })
}
