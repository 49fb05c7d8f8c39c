//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fetcher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the fetcher and wallet client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FetcherConfig {
    /// Candidate base URLs, in priority order.
    pub endpoints: EndpointsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Wallet API paths.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Endpoint candidates.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Primary API base URL.
    pub primary: String,

    /// Fallback base URLs, tried in order after the primary.
    pub fallbacks: Vec<String>,
}

impl EndpointsConfig {
    /// All candidate URLs, primary first.
    pub fn ordered(&self) -> Vec<String> {
        std::iter::once(self.primary.clone())
            .chain(self.fallbacks.iter().cloned())
            .collect()
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            primary: "http://localhost:3000".to_string(),
            fallbacks: Vec::new(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-attempt timeout in milliseconds.
    pub request_ms: u64,

    /// Connection establishment timeout in milliseconds.
    pub connect_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_ms: 15_000,
            connect_ms: 5_000,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds.
    pub ttl_secs: u64,

    /// JSON file backing the cache store. In-memory only when unset.
    pub persistence_path: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 600, // 10 minutes
            persistence_path: None,
        }
    }
}

/// Wallet API paths, relative to each candidate base URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    pub balance_path: String,
    pub transactions_path: String,
    pub virtual_account_path: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            balance_path: "/api/wallet/balance".to_string(),
            transactions_path: "/api/wallet/transactions".to_string(),
            virtual_account_path: "/api/wallet/virtual-account".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: FetcherConfig = toml::from_str(
            r#"
            [endpoints]
            primary = "https://api.example.com"
            fallbacks = ["https://backup.example.com"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.endpoints.ordered(),
            vec!["https://api.example.com", "https://backup.example.com"]
        );
        assert_eq!(config.timeouts.request_ms, 15_000);
        assert_eq!(config.cache.ttl_secs, 600);
        assert!(config.cache.persistence_path.is_none());
        assert!(!config.observability.metrics_enabled);
    }
}
