//! Configuration validation.
//!
//! Returns every problem found rather than stopping at the first one.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::FetcherConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("endpoints.primary must not be empty")]
    MissingPrimary,

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &FetcherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let primary = &config.endpoints.primary;
    if primary.trim().is_empty() {
        errors.push(ValidationError::MissingPrimary);
    } else if let Err(reason) = check_base_url(primary) {
        errors.push(ValidationError::InvalidUrl { url: primary.clone(), reason });
    }
    for url in &config.endpoints.fallbacks {
        let reason = if url.trim().is_empty() {
            Some("empty URL".to_string())
        } else {
            check_base_url(url).err()
        };
        if let Some(reason) = reason {
            errors.push(ValidationError::InvalidUrl { url: url.clone(), reason });
        }
    }

    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_ms"));
    }
    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.connect_ms"));
    }
    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::ZeroValue("cache.ttl_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Accept absolute http(s) URLs only.
pub(crate) fn check_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
