use crate::polling::PollOptions;
use crate::resilience::rate_limiter::RateLimiterSnapshot;
use crate::resilience::retry::RetryExecutor;
use crate::transport::HttpTransport;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Typed client for the OpenAI REST API.
///
/// Cloning is cheap: the HTTP pool, rate limiter and jitter source are shared,
/// so every clone draws from the same token bucket.
#[derive(Clone)]
pub struct OpenAiClient {
    pub(crate) transport: Arc<HttpTransport>,
    pub(crate) executor: RetryExecutor,
    pub(crate) cancel: CancellationToken,
    pub(crate) poll: PollOptions,
}

impl OpenAiClient {
    /// Start from the defaults with the given API key.
    pub fn builder(api_key: impl Into<String>) -> crate::client::builder::OpenAiClientBuilder {
        crate::client::builder::OpenAiClientBuilder::new().api_key(api_key)
    }

    /// A clone whose calls stop waiting when `token` is cancelled.
    ///
    /// Intended to be scoped to a single lifecycle operation so that the
    /// caller's own deadline unwinds rate-limit waits, backoff sleeps and run
    /// polling.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: token,
            ..self.clone()
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn executor(&self) -> &RetryExecutor {
        &self.executor
    }

    /// Default options used by [`OpenAiClient::wait_for_run`].
    pub fn poll_options(&self) -> PollOptions {
        self.poll
    }

    /// Current limiter state, if limiting is enabled.
    pub async fn rate_limiter_snapshot(&self) -> Option<RateLimiterSnapshot> {
        match self.executor.rate_limiter() {
            Some(rl) => Some(rl.snapshot().await),
            None => None,
        }
    }

    pub(crate) async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let transport = self.transport.as_ref();
        self.executor
            .execute(&self.cancel, move || transport.get::<T>(path))
            .await
    }

    pub(crate) async fn get_json_with_query<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let transport = self.transport.as_ref();
        self.executor
            .execute(&self.cancel, move || transport.get_with_query::<T>(path, query))
            .await
    }

    /// POST that creates something upstream.
    pub(crate) async fn create_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let transport = self.transport.as_ref();
        self.executor
            .execute_mutation(&self.cancel, move || transport.post::<B, T>(path, body))
            .await
    }

    /// POST that modifies an existing object; replaying it is harmless.
    pub(crate) async fn update_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let transport = self.transport.as_ref();
        self.executor
            .execute(&self.cancel, move || transport.post::<B, T>(path, body))
            .await
    }

    pub(crate) async fn post_action<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let transport = self.transport.as_ref();
        self.executor
            .execute(&self.cancel, move || transport.post_empty::<T>(path))
            .await
    }

    pub(crate) async fn delete_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let transport = self.transport.as_ref();
        self.executor
            .execute(&self.cancel, move || transport.delete::<T>(path))
            .await
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.transport.base_url())
            .field("policy", self.executor.policy())
            .field("mode", &self.executor.mode())
            .field("poll", &self.poll)
            .finish()
    }
}
