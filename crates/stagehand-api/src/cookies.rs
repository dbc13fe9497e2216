//! Ticket extraction from the session cookie.

use axum::http::{HeaderMap, header};

use stage_core::TICKET_COOKIE;

/// Pull the ticket value out of the `Cookie` request header, if present.
pub fn ticket_from_cookies(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TICKET_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// Render the `Set-Cookie` value that hands a fresh ticket to a client.
pub fn ticket_cookie(ticket: &str) -> String {
    format!("{TICKET_COOKIE}={ticket}; Path=/; HttpOnly")
}
