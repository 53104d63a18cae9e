use std::{collections::BTreeMap, time::Duration};

use reqwest_retry::policies::ExponentialBackoff;
use serde::{Deserialize, Serialize};

/// Backoff for retrying transient transport failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Shortest delay between attempts, in milliseconds
    pub min_interval_ms: u64,
    /// Longest delay between attempts, in milliseconds
    pub max_interval_ms: u64,
    /// Exponent base of the backoff
    pub base: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_interval_ms: 250,
            max_interval_ms: 8_000,
            base: 2,
        }
    }
}

impl RetryConfig {
    /// No retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub(crate) fn policy(&self) -> ExponentialBackoff {
        ExponentialBackoff::builder()
            .retry_bounds(
                Duration::from_millis(self.min_interval_ms),
                Duration::from_millis(self.max_interval_ms.max(self.min_interval_ms)),
            )
            .base(self.base)
            .build_with_max_retries(self.max_retries)
    }
}

/// Configuration of the transports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcClientConfig {
    /// Per-request timeout in milliseconds
    pub request_timeout: u64,
    /// Retry policy for idempotent requests
    pub retry: RetryConfig,
    /// Defaults to `quill/<version>`
    pub user_agent: Option<String>,
    /// Headers added to every HTTP request
    pub extra_headers: BTreeMap<String, String>,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: 30_000,
            retry: RetryConfig::default(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
        }
    }
}

impl RpcClientConfig {
    /// Parses a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// The per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    pub(crate) fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("quill/{}", env!("CARGO_PKG_VERSION")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() -> anyhow::Result<()> {
        assert_eq!(RpcClientConfig::from_toml_str("")?, RpcClientConfig::default());
        Ok(())
    }

    #[test]
    fn partial_toml_keeps_other_defaults() -> anyhow::Result<()> {
        let config = RpcClientConfig::from_toml_str(
            r#"
            request_timeout = 5000
            user_agent = "indexer/1.0"

            [retry]
            max_retries = 5

            [extra_headers]
            Authorization = "Bearer secret"
            "#,
        )?;

        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent(), "indexer/1.0");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base, RetryConfig::default().base);
        assert_eq!(
            config.extra_headers.get("Authorization").map(String::as_str),
            Some("Bearer secret")
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(RpcClientConfig::from_toml_str("request_timeout = \"soon\"").is_err());
    }
}
