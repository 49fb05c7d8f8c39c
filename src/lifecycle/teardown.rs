//! Request cancellation scoped to a view's lifetime.

use tokio_util::sync::CancellationToken;

/// Issues one cancellation token per logical request and cancels all of
/// them together when the owning view goes away.
///
/// Dropping the scope cancels every token it issued, so requests started by
/// a torn-down screen cannot deliver late results.
#[derive(Debug)]
pub struct TeardownScope {
    root: CancellationToken,
}

impl TeardownScope {
    pub fn new() -> Self {
        Self {
            root: CancellationToken::new(),
        }
    }

    /// Token for a new logical request. Cancelling it affects only that
    /// request; triggering the scope cancels it too.
    pub fn token(&self) -> CancellationToken {
        self.root.child_token()
    }

    /// Cancel every request issued from this scope.
    pub fn trigger(&self) {
        self.root.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl Default for TeardownScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TeardownScope {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
