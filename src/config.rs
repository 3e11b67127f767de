//! Provider configuration.
//!
//! Explicit values win over environment variables:
//! - `OPENAI_API_KEY` (required when `api_key` is not set)
//! - `OPENAI_ORGANIZATION`
//! - `OPENAI_BASE_URL` (default `https://api.openai.com/v1`)
//! - `OPENAI_DEBUG` (`1`/`true` enables debug logging)

use crate::resilience::rate_limiter::RateLimiterConfig;
use crate::resilience::retry::{
    RetryMode, RetryPolicy, DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF,
};
use crate::transport::{TransportConfig, DEFAULT_BASE_URL};
use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ORGANIZATION: &str = "OPENAI_ORGANIZATION";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_DEBUG: &str = "OPENAI_DEBUG";

/// Smallest non-zero `rate_limit_rps` accepted (one request every ~17 minutes).
pub const MIN_RATE_LIMIT_RPS: f64 = 0.001;

/// User-facing provider settings. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub organization: Option<String>,
    pub base_url: Option<String>,
    pub debug: Option<bool>,
    pub max_retries: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_idle_conns_per_host: Option<usize>,
    pub rate_limit_rps: Option<f64>,
    pub rate_limit_burst: Option<u32>,
    /// Attempt creates once instead of retrying them.
    pub retry_idempotent_only: Option<bool>,
}

/// Validated configuration consumed by [`crate::OpenAiClientBuilder`].
#[derive(Clone)]
pub struct ResolvedConfig {
    pub transport: TransportConfig,
    pub retry: RetryPolicy,
    pub retry_mode: RetryMode,
    pub rate_limit: RateLimiterConfig,
    pub debug: bool,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("base_url", &self.transport.base_url)
            .field("api_key", &"<redacted>")
            .field("organization", &self.transport.organization)
            .field("retry", &self.retry)
            .field("retry_mode", &self.retry_mode)
            .field("rate_limit", &self.rate_limit)
            .field("debug", &self.debug)
            .finish()
    }
}

impl ProviderConfig {
    /// Parse from a JSON document (the shape a provider block serializes to).
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid provider configuration: {}", e),
                ErrorContext::new().with_source("provider_config"),
            )
        })
    }

    /// Merge with the process environment and validate.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Like [`ProviderConfig::resolve`] with an injectable environment lookup.
    pub fn resolve_with<F>(&self, env: F) -> Result<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let api_key = non_empty(self.api_key.clone())
            .or_else(|| non_empty(env(ENV_API_KEY)))
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key is required",
                    ErrorContext::new()
                        .with_field_path("provider.api_key")
                        .with_details(format!("set api_key or the {} environment variable", ENV_API_KEY))
                        .with_source("provider_config"),
                )
            })?;

        let organization =
            non_empty(self.organization.clone()).or_else(|| non_empty(env(ENV_ORGANIZATION)));

        let base_url = non_empty(self.base_url.clone())
            .or_else(|| non_empty(env(ENV_BASE_URL)))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let parsed = url::Url::parse(&base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("provider.base_url")
                    .with_details(base_url.clone())
                    .with_source("provider_config"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                format!("unsupported base URL scheme: {}", parsed.scheme()),
                ErrorContext::new()
                    .with_field_path("provider.base_url")
                    .with_details("expected http or https")
                    .with_source("provider_config"),
            ));
        }

        let debug = self.debug.unwrap_or_else(|| {
            env(ENV_DEBUG)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        });

        let initial = self
            .initial_backoff_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_INITIAL_BACKOFF);
        let max = self
            .max_backoff_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MAX_BACKOFF);
        if initial > max {
            return Err(Error::configuration_with_context(
                "initial backoff must not exceed max backoff",
                ErrorContext::new()
                    .with_field_path("provider.initial_backoff_ms")
                    .with_details(format!(
                        "initial {}ms > max {}ms",
                        initial.as_millis(),
                        max.as_millis()
                    ))
                    .with_source("provider_config"),
            ));
        }
        let retry = RetryPolicy::new(self.max_retries.unwrap_or(DEFAULT_MAX_ATTEMPTS), initial, max);

        let retry_mode = if self.retry_idempotent_only.unwrap_or(false) {
            RetryMode::IdempotentOnly
        } else {
            RetryMode::Blanket
        };

        let mut rate_limit = RateLimiterConfig::new();
        if let Some(rps) = self.rate_limit_rps {
            if !rps.is_finite() || rps < 0.0 || (rps > 0.0 && rps < MIN_RATE_LIMIT_RPS) {
                return Err(Error::configuration_with_context(
                    format!(
                        "rate limit must be 0 (disabled) or at least {} requests per second",
                        MIN_RATE_LIMIT_RPS
                    ),
                    ErrorContext::new()
                        .with_field_path("provider.rate_limit_rps")
                        .with_details(rps.to_string())
                        .with_source("provider_config"),
                ));
            }
            rate_limit = rate_limit.with_refill_rate(rps);
        }
        if let Some(burst) = self.rate_limit_burst {
            rate_limit = rate_limit.with_max_tokens(burst);
        }

        let defaults = TransportConfig::default();
        let transport = TransportConfig {
            base_url,
            api_key,
            organization,
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            pool_max_idle_per_host: self
                .max_idle_conns_per_host
                .unwrap_or(defaults.pool_max_idle_per_host),
            pool_idle_timeout: defaults.pool_idle_timeout,
        };

        Ok(ResolvedConfig {
            transport,
            retry,
            retry_mode,
            rate_limit,
            debug,
        })
    }
}
