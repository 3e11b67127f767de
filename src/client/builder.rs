use crate::client::core::OpenAiClient;
use crate::config::ResolvedConfig;
use crate::polling::PollOptions;
use crate::resilience::backoff::JitterSource;
use crate::resilience::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::resilience::retry::{RetryExecutor, RetryMode, RetryPolicy};
use crate::transport::{HttpTransport, TransportConfig};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Builder for [`OpenAiClient`].
///
/// Defaults: 5 attempts with 1s..30s backoff, 1 request/second with a burst of
/// five, 60s request timeout, runs polled every 5s for up to 10 minutes.
pub struct OpenAiClientBuilder {
    transport: TransportConfig,
    retry: RetryPolicy,
    mode: RetryMode,
    rate_limit: Option<RateLimiterConfig>,
    jitter: Option<Arc<dyn JitterSource>>,
    poll: PollOptions,
    cancel: Option<CancellationToken>,
}

impl OpenAiClientBuilder {
    pub fn new() -> Self {
        Self {
            transport: TransportConfig::default(),
            retry: RetryPolicy::default(),
            mode: RetryMode::default(),
            rate_limit: Some(RateLimiterConfig::new()),
            jitter: None,
            poll: PollOptions::default(),
            cancel: None,
        }
    }

    /// Seed every knob from a validated provider configuration.
    pub fn from_config(cfg: &ResolvedConfig) -> Self {
        Self {
            transport: cfg.transport.clone(),
            retry: cfg.retry,
            mode: cfg.retry_mode,
            rate_limit: Some(cfg.rate_limit.clone()),
            ..Self::new()
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.transport.api_key = key.into();
        self
    }

    pub fn organization(mut self, org: impl Into<String>) -> Self {
        self.transport.organization = Some(org.into());
        self
    }

    /// Override the base URL (primarily for testing with mock servers).
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.transport.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn retry_mode(mut self, mode: RetryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn rate_limit(mut self, cfg: RateLimiterConfig) -> Self {
        self.rate_limit = Some(cfg);
        self
    }

    /// Disable client-side rate limiting entirely.
    pub fn no_rate_limit(mut self) -> Self {
        self.rate_limit = None;
        self
    }

    /// Replace the backoff jitter source (tests pin it with `FixedJitter`).
    pub fn jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = Some(jitter);
        self
    }

    pub fn poll_options(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(self) -> Result<OpenAiClient> {
        if self.transport.api_key.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "API key is required",
                ErrorContext::new()
                    .with_field_path("provider.api_key")
                    .with_source("client_builder"),
            ));
        }
        let transport = Arc::new(HttpTransport::new(&self.transport)?);

        let mut executor = RetryExecutor::new(self.retry).with_mode(self.mode);
        if let Some(cfg) = self.rate_limit {
            executor = executor.with_rate_limiter(Arc::new(RateLimiter::new(cfg)));
        }
        if let Some(jitter) = self.jitter {
            executor = executor.with_jitter(jitter);
        }

        tracing::debug!(
            base_url = %transport.base_url(),
            max_attempts = self.retry.max_attempts(),
            mode = ?self.mode,
            "built OpenAI client"
        );

        Ok(OpenAiClient {
            transport,
            executor,
            cancel: self.cancel.unwrap_or_default(),
            poll: self.poll,
        })
    }
}

impl Default for OpenAiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_api_key() {
        let err = OpenAiClientBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = OpenAiClient::builder("sk-test")
            .base_url_override("http://127.0.0.1:1234/v1/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1234/v1");
        assert_eq!(client.executor().policy().max_attempts(), 5);
        assert!(client.executor().rate_limiter().is_some());
    }

    #[tokio::test]
    async fn test_clones_share_the_rate_limiter() {
        let client = OpenAiClient::builder("sk-test")
            .rate_limit(RateLimiterConfig::new().with_refill_rate(0.001).with_max_tokens(2))
            .build()
            .unwrap();
        let scoped = client.with_cancellation(CancellationToken::new());
        assert!(scoped.executor().rate_limiter().unwrap().try_acquire().await);
        let snap = client.rate_limiter_snapshot().await.unwrap();
        assert!(snap.tokens < 1.5);
    }
}
