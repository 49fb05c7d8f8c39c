//! Request correlation.
//!
//! Every logical request gets a UUID v4 and runs inside a span carrying it,
//! so the per-candidate events of one request can be grouped.

use tracing::Span;
use uuid::Uuid;

use crate::fetch::types::Method;

/// Span for one logical request.
pub fn request_span(request_id: Uuid, method: Method, path: &str, candidates: usize) -> Span {
    tracing::info_span!(
        "fetch",
        request_id = %request_id,
        method = %method,
        path = %path,
        candidates
    )
}
