//! stagehand-relay — the narrow outbound relay behind the cue endpoint.
//!
//! Two forwarding paths live here:
//!
//! - **Cues**: caller-shaped requests, allowed only against one
//!   hard-coded host over plain `http`. The allow-list check in
//!   [`parse_cue_target`] is the sole SSRF boundary on this path and is
//!   strict equality on scheme and hostname.
//! - **Diagnostics**: a fixed-shape `{url}` POST to the orchestrator's
//!   privileged endpoint. The target URL inside it is deliberately not
//!   validated here — the orchestrator fetches it without an allow-list,
//!   and every protection is the caller's ticket/cooldown gate.
//!
//! Downstream status, content-type, and body are mirrored verbatim.
//! Transport failures surface as [`RelayError`] and are reduced to a
//! generic message at the API layer; the underlying error never reaches
//! the client.

pub mod forward;
pub mod target;

pub use forward::{RelayError, RelayedResponse, forward_diagnostics, send_cue};
pub use target::parse_cue_target;
