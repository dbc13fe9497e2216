//! Cue target validation.

use reqwest::Url;

/// Parse and validate a cue target against the allow-listed host.
///
/// Accepts only URLs whose scheme is exactly `http` and whose hostname is
/// exactly `allowed_host`. Equality, not prefix or substring matching:
/// `http://nginx.evil.com/` must not pass for an allow-list of `nginx`.
/// Returns `None` for anything else, including unparsable input — a
/// rejected target is never fetched.
pub fn parse_cue_target(raw: &str, allowed_host: &str) -> Option<Url> {
    let parsed = Url::parse(raw).ok()?;

    if parsed.scheme() != "http" {
        return None;
    }
    if parsed.host_str() != Some(allowed_host) {
        return None;
    }

    Some(parsed)
}
