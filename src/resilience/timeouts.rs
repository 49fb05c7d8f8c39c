//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap each candidate attempt with a deadline
//! - Drop the wrapped future on expiry, which aborts the in-flight call
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The attempt did not settle before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out after {}ms", .0.as_millis())]
pub struct TimedOut(pub Duration);

impl TimedOut {
    pub fn after_ms(&self) -> u64 {
        self.0.as_millis().try_into().unwrap_or(u64::MAX)
    }
}

/// Run `fut` with a deadline of `limit`.
pub async fn enforce<F: Future>(limit: Duration, fut: F) -> Result<F::Output, TimedOut> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| TimedOut(limit))
}
