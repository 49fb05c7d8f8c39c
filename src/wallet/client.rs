//! Wallet API client.
//!
//! # Responsibilities
//! - Map wallet use cases onto logical requests
//! - Cache virtual-account lookups per gateway
//! - Normalize gateway-specific payloads into typed results

use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

use crate::cache::ResponseCache;
use crate::config::{FetcherConfig, WalletConfig};
use crate::fetch::{EndpointCandidates, RequestSpec, ResilientFetcher};
use crate::wallet::types::{transactions_from_payload, Balance, VirtualAccount, WalletError};

/// Cache key for the virtual-account lookup. The gateway is the category
/// tag, so switching gateways invalidates the entry.
pub const VIRTUAL_ACCOUNT_CACHE_KEY: &str = "virtual_account";

#[derive(Debug, Clone)]
pub struct WalletClient {
    fetcher: ResilientFetcher,
    candidates: EndpointCandidates,
    cache: ResponseCache,
    paths: WalletConfig,
    timeout_ms: u64,
    auth_token: Option<String>,
}

impl WalletClient {
    pub fn new(
        fetcher: ResilientFetcher,
        candidates: EndpointCandidates,
        cache: ResponseCache,
        paths: WalletConfig,
        timeout_ms: u64,
    ) -> Self {
        Self {
            fetcher,
            candidates,
            cache,
            paths,
            timeout_ms,
            auth_token: None,
        }
    }

    /// Build the reqwest-backed client, candidates and cache described by
    /// `config`.
    pub fn from_config(config: &FetcherConfig) -> Result<Self, WalletError> {
        let fetcher = ResilientFetcher::from_config(&config.timeouts)?;
        let candidates = EndpointCandidates::new(config.endpoints.ordered())?;
        let cache = ResponseCache::from_config(&config.cache)?;

        tracing::info!(
            candidates = candidates.len(),
            timeout_ms = config.timeouts.request_ms,
            cache_ttl_secs = config.cache.ttl_secs,
            "Wallet client initialized"
        );

        Ok(Self::new(
            fetcher,
            candidates,
            cache,
            config.wallet.clone(),
            config.timeouts.request_ms,
        ))
    }

    /// Attach a bearer token to every request. Blank tokens are ignored by
    /// the fetcher.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn fetcher(&self) -> &ResilientFetcher {
        &self.fetcher
    }

    pub fn candidates(&self) -> &EndpointCandidates {
        &self.candidates
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub async fn balance(&self, cancel: &CancellationToken) -> Result<Balance, WalletError> {
        let spec = RequestSpec::get(&self.paths.balance_path, self.timeout_ms)?;
        let payload = self
            .fetcher
            .request(&spec, &self.candidates, self.auth_token(), cancel)
            .await
            .into_result()?;
        Balance::from_payload(&payload)
    }

    pub async fn transactions(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<serde_json::Value>, WalletError> {
        let spec = RequestSpec::get(&self.paths.transactions_path, self.timeout_ms)?;
        let payload = self
            .fetcher
            .request(&spec, &self.candidates, self.auth_token(), cancel)
            .await
            .into_result()?;
        transactions_from_payload(payload)
    }

    /// Virtual account for `gateway`, served from cache while fresh.
    pub async fn virtual_account(
        &self,
        gateway: &str,
        force_refresh: bool,
        cancel: &CancellationToken,
    ) -> Result<VirtualAccount, WalletError> {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("gateway", gateway)
            .finish();
        let path = format!("{}?{}", self.paths.virtual_account_path, query);
        let spec = RequestSpec::get(path, self.timeout_ms)?;

        // Payloads that do not normalize are rejected before they reach the cache.
        let payload = self
            .cache
            .get_or_fetch(
                VIRTUAL_ACCOUNT_CACHE_KEY,
                gateway,
                || async {
                    let payload = self
                        .fetcher
                        .request(&spec, &self.candidates, self.auth_token(), cancel)
                        .await
                        .into_result()?;
                    VirtualAccount::from_payload(&payload, gateway)?;
                    Ok::<_, WalletError>(payload)
                },
                force_refresh,
            )
            .await?;
        VirtualAccount::from_payload(&payload, gateway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_cache_store_is_a_store_error() {
        // A directory cannot be read as a store file.
        let dir = tempfile::tempdir().unwrap();
        let mut config = FetcherConfig::default();
        config.cache.persistence_path = Some(dir.path().to_string_lossy().into_owned());

        let err = WalletClient::from_config(&config).err().unwrap();
        assert!(matches!(err, WalletError::Store(_)));
        let message = err.to_string();
        assert!(message.starts_with("cache store error"), "{message}");
        assert!(!message.contains("HTTP client"), "{message}");
    }
}
