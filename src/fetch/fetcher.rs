//! Ordered-candidate HTTP requester.
//!
//! # Responsibilities
//! - Try candidates strictly in order, one at a time
//! - Enforce the per-attempt timeout
//! - Stop on the first 2xx or the first 401/403
//! - Race every attempt against the caller's cancellation token
//!
//! # Design Decisions
//! - Cancellation drops the in-flight future, which releases the timer and
//!   the connection together; nothing from a cancelled request is observed
//! - No retries: a candidate that failed is not contacted again

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::cache::ResponseCache;
use crate::config::TimeoutConfig;
use crate::fetch::envelope::{extract_message, extract_payload, parse_body};
use crate::fetch::error::{FetchError, FetchResult};
use crate::fetch::transport::{
    OutboundRequest, RawResponse, ReqwestTransport, Transport, TransportError,
};
use crate::fetch::types::{
    AttemptError, AttemptErrorKind, EndpointCandidates, RequestOutcome, RequestSpec, Settlement,
};
use crate::observability::{metrics, spans};
use crate::resilience::classify::{classify_status, status_text, StatusClass};
use crate::resilience::timeouts::{enforce, TimedOut};

/// Where a fetched payload lives in the response cache.
#[derive(Debug, Clone, Copy)]
pub struct CacheSlot<'a> {
    pub key: &'a str,
    /// Category tag the entry must match (e.g. the active payment gateway).
    pub category: &'a str,
    /// Discard any existing entry and always hit the network.
    pub force_refresh: bool,
}

/// Result of judging one settled attempt.
enum Verdict {
    Done(RequestOutcome),
    Next(AttemptErrorKind),
}

/// Performs logical requests against ordered endpoint candidates.
#[derive(Clone)]
pub struct ResilientFetcher {
    transport: Arc<dyn Transport>,
}

impl ResilientFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetcher over a reqwest client configured from `timeouts`.
    pub fn from_config(timeouts: &TimeoutConfig) -> FetchResult<Self> {
        let transport = ReqwestTransport::new(Duration::from_millis(timeouts.connect_ms))
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Perform one logical request.
    ///
    /// `auth_token` is sent as a bearer token only when non-blank. Resolves
    /// to [`Settlement::Cancelled`] as soon as `cancel` fires, whatever
    /// attempt is in flight.
    pub async fn request(
        &self,
        spec: &RequestSpec,
        candidates: &EndpointCandidates,
        auth_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Settlement {
        let span = spans::request_span(Uuid::new_v4(), spec.method(), spec.path(), candidates.len());
        let settlement = self
            .run(spec, candidates, auth_token, cancel)
            .instrument(span)
            .await;

        metrics::record_request(match &settlement {
            Settlement::Completed(RequestOutcome::Success(_)) => "success",
            Settlement::Completed(RequestOutcome::AuthFailure(_)) => "auth_failure",
            Settlement::Completed(RequestOutcome::TransientFailure(_)) => "transient_failure",
            Settlement::Cancelled => "cancelled",
        });
        settlement
    }

    /// Request through `cache`: a valid entry short-circuits the network,
    /// a successful response is stored. Failures and cancellation write
    /// nothing.
    pub async fn fetch_cached(
        &self,
        cache: &ResponseCache,
        slot: CacheSlot<'_>,
        spec: &RequestSpec,
        candidates: &EndpointCandidates,
        auth_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> FetchResult<Value> {
        cache
            .get_or_fetch(
                slot.key,
                slot.category,
                || async {
                    self.request(spec, candidates, auth_token, cancel)
                        .await
                        .into_result()
                },
                slot.force_refresh,
            )
            .await
    }

    async fn run(
        &self,
        spec: &RequestSpec,
        candidates: &EndpointCandidates,
        auth_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Settlement {
        let headers = build_headers(spec, auth_token);
        let mut errors = Vec::with_capacity(candidates.len());

        for (index, base) in candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::debug!(candidate = index, "Cancelled before attempt");
                return Settlement::Cancelled;
            }

            let url = EndpointCandidates::join(base, spec.path());
            let outbound = OutboundRequest {
                method: spec.method(),
                url: url.clone(),
                headers: headers.clone(),
                body: spec.body().map(<[u8]>::to_vec),
            };

            let started = Instant::now();
            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(candidate = index, url = %url, "Cancelled during attempt");
                    return Settlement::Cancelled;
                }
                result = enforce(spec.timeout(), self.transport.send(outbound)) => result,
            };
            let elapsed = started.elapsed();

            match judge(attempt) {
                Verdict::Done(outcome) => {
                    match &outcome {
                        RequestOutcome::Success(_) => {
                            metrics::record_attempt("success", elapsed);
                            tracing::debug!(
                                candidate = index,
                                url = %url,
                                elapsed_ms = elapsed.as_millis() as u64,
                                "Candidate succeeded"
                            );
                        }
                        RequestOutcome::AuthFailure(message) => {
                            metrics::record_attempt("auth", elapsed);
                            tracing::warn!(
                                candidate = index,
                                url = %url,
                                message = %message,
                                "Authentication rejected, not trying remaining candidates"
                            );
                        }
                        RequestOutcome::TransientFailure(_) => {}
                    }
                    return Settlement::Completed(outcome);
                }
                Verdict::Next(kind) => {
                    metrics::record_attempt(attempt_label(&kind), elapsed);
                    let error = AttemptError {
                        candidate: index,
                        url: base.as_str().trim_end_matches('/').to_string(),
                        kind,
                    };
                    tracing::warn!(error = %error, "Candidate failed, trying next");
                    errors.push(error);
                }
            }
        }

        tracing::warn!(attempts = errors.len(), "All candidates failed");
        Settlement::Completed(RequestOutcome::TransientFailure(errors))
    }
}

impl std::fmt::Debug for ResilientFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientFetcher").finish_non_exhaustive()
    }
}

/// Defaults, then caller headers, then the bearer token.
fn build_headers(spec: &RequestSpec, auth_token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = BTreeMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    headers.insert("accept".to_string(), "application/json".to_string());
    for (name, value) in spec.headers() {
        headers.insert(name.clone(), value.clone());
    }
    if let Some(token) = auth_token.map(str::trim).filter(|t| !t.is_empty()) {
        headers.insert("authorization".to_string(), format!("Bearer {}", token));
    }
    headers.into_iter().collect()
}

fn judge(attempt: Result<Result<RawResponse, TransportError>, TimedOut>) -> Verdict {
    let response = match attempt {
        Err(timed_out) => {
            return Verdict::Next(AttemptErrorKind::Timeout {
                after_ms: timed_out.after_ms(),
            })
        }
        Ok(Err(e)) => return Verdict::Next(AttemptErrorKind::Network(e.to_string())),
        Ok(Ok(response)) => response,
    };

    let body = parse_body(&response.body);
    match classify_status(response.status) {
        StatusClass::Success => match body {
            Ok(value) => Verdict::Done(RequestOutcome::Success(extract_payload(value))),
            Err(e) => Verdict::Next(AttemptErrorKind::Parse(e.to_string())),
        },
        StatusClass::Auth => Verdict::Done(RequestOutcome::AuthFailure(failure_message(
            response.status,
            body.ok(),
        ))),
        StatusClass::Transient => Verdict::Next(AttemptErrorKind::Status {
            code: response.status,
            message: failure_message(response.status, body.ok()),
        }),
    }
}

fn failure_message(status: u16, body: Option<Value>) -> String {
    body.as_ref()
        .and_then(extract_message)
        .unwrap_or_else(|| status_text(status))
}

fn attempt_label(kind: &AttemptErrorKind) -> &'static str {
    match kind {
        AttemptErrorKind::Timeout { .. } => "timeout",
        AttemptErrorKind::Status { .. } => "status",
        AttemptErrorKind::Network(_) => "network",
        AttemptErrorKind::Parse(_) => "parse",
    }
}
