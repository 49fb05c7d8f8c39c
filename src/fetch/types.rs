//! Request, candidate and outcome types.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::validation::check_base_url;
use crate::fetch::error::{FetchError, FetchResult};

/// HTTP methods the fetcher issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical request, independent of which endpoint serves it.
///
/// Built with the consuming `with_*` methods and immutable once handed to
/// the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    path: String,
    method: Method,
    /// Header names are stored lowercased.
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
    timeout: Duration,
}

impl RequestSpec {
    /// Create a request with a per-attempt timeout in milliseconds.
    pub fn new(method: Method, path: impl Into<String>, timeout_ms: u64) -> FetchResult<Self> {
        if timeout_ms == 0 {
            return Err(FetchError::InvalidTimeout);
        }
        Ok(Self {
            path: path.into(),
            method,
            headers: BTreeMap::new(),
            body: None,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn get(path: impl Into<String>, timeout_ms: u64) -> FetchResult<Self> {
        Self::new(Method::Get, path, timeout_ms)
    }

    /// POST with a JSON-encoded body.
    pub fn post_json<T: Serialize>(
        path: impl Into<String>,
        body: &T,
        timeout_ms: u64,
    ) -> FetchResult<Self> {
        Ok(Self::new(Method::Post, path, timeout_ms)?.with_body(serde_json::to_vec(body)?))
    }

    /// PUT with a JSON-encoded body.
    pub fn put_json<T: Serialize>(
        path: impl Into<String>,
        body: &T,
        timeout_ms: u64,
    ) -> FetchResult<Self> {
        Ok(Self::new(Method::Put, path, timeout_ms)?.with_body(serde_json::to_vec(body)?))
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Ordered, non-empty list of base URLs. Earlier entries are preferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCandidates {
    urls: Vec<Url>,
}

impl EndpointCandidates {
    /// Parse candidates in priority order. Fails fast on an empty list or
    /// any entry that is not an absolute http(s) URL.
    pub fn new<I, S>(urls: I) -> FetchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls = urls
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                check_base_url(raw).map_err(|reason| FetchError::InvalidEndpoint {
                    url: raw.to_string(),
                    reason,
                })
            })
            .collect::<FetchResult<Vec<_>>>()?;

        if urls.is_empty() {
            return Err(FetchError::NoCandidates);
        }
        Ok(Self { urls })
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Never true once constructed.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.urls.iter()
    }

    /// Join a base URL with a relative request path.
    pub fn join(base: &Url, path: &str) -> String {
        let base = base.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// Why a single candidate attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptErrorKind {
    Timeout { after_ms: u64 },
    Status { code: u16, message: String },
    Network(String),
    Parse(String),
}

impl fmt::Display for AttemptErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptErrorKind::Timeout { after_ms } => write!(f, "timed out after {}ms", after_ms),
            AttemptErrorKind::Status { code, message } => write!(f, "HTTP {}: {}", code, message),
            AttemptErrorKind::Network(msg) => write!(f, "network error: {}", msg),
            AttemptErrorKind::Parse(msg) => write!(f, "invalid JSON body: {}", msg),
        }
    }
}

/// A failed attempt, tagged with the candidate that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptError {
    /// Position in the candidate list.
    pub candidate: usize,
    /// Base URL of the candidate.
    pub url: String,
    pub kind: AttemptErrorKind,
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "candidate {} ({}): {}", self.candidate, self.url, self.kind)
    }
}

/// Conclusion of a logical request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// Normalized payload from the first 2xx response.
    Success(Value),
    /// 401/403 from any candidate.
    AuthFailure(String),
    /// One error per candidate, in attempt order.
    TransientFailure(Vec<AttemptError>),
}

/// How a request settled. `Cancelled` carries no conclusion.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Completed(RequestOutcome),
    Cancelled,
}

impl Settlement {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Settlement::Cancelled)
    }

    /// Collapse into a `Result` for `?`-style callers.
    pub fn into_result(self) -> FetchResult<Value> {
        match self {
            Settlement::Completed(RequestOutcome::Success(payload)) => Ok(payload),
            Settlement::Completed(RequestOutcome::AuthFailure(msg)) => Err(FetchError::Auth(msg)),
            Settlement::Completed(RequestOutcome::TransientFailure(errors)) => {
                Err(FetchError::Transient(errors))
            }
            Settlement::Cancelled => Err(FetchError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(matches!(
            RequestSpec::get("/balance", 0),
            Err(FetchError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let spec = RequestSpec::get("/x", 100)
            .unwrap()
            .with_header("X-Trace", "a")
            .with_header("x-trace", "b");
        assert_eq!(spec.headers().len(), 1);
        assert_eq!(spec.headers()["x-trace"], "b");
    }

    #[test]
    fn test_post_json_encodes_body() {
        let spec = RequestSpec::post_json("/cards/charge", &serde_json::json!({"amount": 500}), 1000)
            .unwrap();
        assert_eq!(spec.method(), Method::Post);
        assert_eq!(spec.body(), Some(&br#"{"amount":500}"#[..]));
    }

    #[test]
    fn test_empty_candidates_fail_fast() {
        let empty: Vec<&str> = Vec::new();
        assert!(matches!(
            EndpointCandidates::new(empty),
            Err(FetchError::NoCandidates)
        ));

        let one = EndpointCandidates::new(["https://ok.example"]).unwrap();
        assert!(!one.is_empty());
    }

    #[test]
    fn test_invalid_candidate_rejected() {
        let err = EndpointCandidates::new(["https://ok.example", "not a url"]).unwrap_err();
        assert!(matches!(err, FetchError::InvalidEndpoint { ref url, .. } if url == "not a url"));
    }

    #[test]
    fn test_join_paths() {
        let candidates =
            EndpointCandidates::new(["https://api.example.com", "https://b.example.com/v1/"])
                .unwrap();
        let urls: Vec<_> = candidates.iter().collect();
        assert_eq!(
            EndpointCandidates::join(urls[0], "/wallet/balance"),
            "https://api.example.com/wallet/balance"
        );
        assert_eq!(
            EndpointCandidates::join(urls[1], "wallet?gateway=a"),
            "https://b.example.com/v1/wallet?gateway=a"
        );
        assert_eq!(EndpointCandidates::join(urls[0], ""), "https://api.example.com");
    }

    #[test]
    fn test_settlement_into_result() {
        let ok = Settlement::Completed(RequestOutcome::Success(serde_json::json!({"x": 1})));
        assert_eq!(ok.into_result().unwrap()["x"], 1);
        assert!(matches!(
            Settlement::Cancelled.into_result(),
            Err(FetchError::Cancelled)
        ));
        assert!(matches!(
            Settlement::Completed(RequestOutcome::AuthFailure("no".into())).into_result(),
            Err(FetchError::Auth(_))
        ));
    }
}
