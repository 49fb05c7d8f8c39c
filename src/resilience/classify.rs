//! Response status classification.
//!
//! # Rules
//! - 2xx: success, stop trying candidates
//! - 401/403: auth failure, stop trying candidates (all endpoints share one
//!   identity provider)
//! - anything else: transient, move to the next candidate

/// How a status code steers the candidate loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Auth,
    Transient,
}

pub fn classify_status(code: u16) -> StatusClass {
    match code {
        200..=299 => StatusClass::Success,
        401 | 403 => StatusClass::Auth,
        _ => StatusClass::Transient,
    }
}

/// `"HTTP 403 Forbidden"`-style text for bodies that carry no message.
pub fn status_text(code: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");
    format!("HTTP {} {}", code, reason)
}
