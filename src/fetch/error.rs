//! Fetch error definitions.

use thiserror::Error;

use crate::fetch::types::AttemptError;

/// Errors surfaced by the fetch layer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Candidate list was empty.
    #[error("no endpoint candidates configured")]
    NoCandidates,

    /// A candidate base URL could not be used.
    #[error("invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Per-attempt timeout must be positive.
    #[error("request timeout must be greater than zero")]
    InvalidTimeout,

    /// Request body could not be encoded as JSON.
    #[error("request body could not be encoded: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// Credentials rejected (401/403). Not retried on other candidates.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Every candidate failed transiently.
    #[error("all candidates failed: {}", join_attempts(.0))]
    Transient(Vec<AttemptError>),

    /// The request was abandoned before it settled.
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// True for failures a caller may reasonably offer to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

fn join_attempts(errors: &[AttemptError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::types::AttemptErrorKind;

    #[test]
    fn test_error_display() {
        let err = FetchError::Transient(vec![
            AttemptError {
                candidate: 0,
                url: "https://a.example".to_string(),
                kind: AttemptErrorKind::Timeout { after_ms: 100 },
            },
            AttemptError {
                candidate: 1,
                url: "https://b.example".to_string(),
                kind: AttemptErrorKind::Status {
                    code: 502,
                    message: "Bad Gateway".to_string(),
                },
            },
        ]);
        assert_eq!(
            err.to_string(),
            "all candidates failed: candidate 0 (https://a.example): timed out after 100ms; \
             candidate 1 (https://b.example): HTTP 502: Bad Gateway"
        );
        assert!(err.is_retryable());
        assert!(!FetchError::Cancelled.is_retryable());
        assert!(!FetchError::Auth("expired".into()).is_retryable());
    }
}
