//! OS signal handling.

use tokio_util::sync::CancellationToken;

/// Cancel `token` on Ctrl-C. Returns early if the token is cancelled first.
pub async fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => {
                    tracing::info!("Interrupt received, cancelling in-flight request");
                    token.cancel();
                }
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
            }
        }
        _ = token.cancelled() => {}
    }
}
