//! Retry executor: rate-limit, invoke, classify, back off, repeat.

use super::backoff::{Backoff, JitterSource};
use super::classify::is_retryable;
use super::rate_limiter::RateLimiter;
use crate::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(30_000);

/// Attempt budget and backoff bounds, fixed at client construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least 1 and `max_backoff` to at least `initial_backoff`.
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_INITIAL_BACKOFF,
            DEFAULT_MAX_BACKOFF,
        )
    }
}

/// Which calls the executor is allowed to repeat.
///
/// `Blanket` retries everything, including creates. A create whose response was
/// lost after the upstream accepted it will be submitted again and may produce a
/// duplicate resource. `IdempotentOnly` runs calls submitted through
/// [`RetryExecutor::execute_mutation`] exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryMode {
    #[default]
    Blanket,
    IdempotentOnly,
}

#[derive(Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
    mode: RetryMode,
    backoff: Backoff,
    limiter: Option<Arc<RateLimiter>>,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            mode: RetryMode::default(),
            backoff: Backoff::new(policy.initial_backoff(), policy.max_backoff()),
            limiter: None,
        }
    }

    pub fn with_mode(mut self, mode: RetryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.backoff = self.backoff.with_jitter(jitter);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn mode(&self) -> RetryMode {
        self.mode
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn rate_limiter(&self) -> Option<&Arc<RateLimiter>> {
        self.limiter.as_ref()
    }

    /// Run an idempotent operation with the full attempt budget.
    pub async fn execute<T, F, Fut>(&self, cancel: &CancellationToken, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run(cancel, self.policy.max_attempts(), op).await
    }

    /// Run a call that creates or changes upstream state.
    ///
    /// Retried like any other call in [`RetryMode::Blanket`], attempted once in
    /// [`RetryMode::IdempotentOnly`].
    pub async fn execute_mutation<T, F, Fut>(&self, cancel: &CancellationToken, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.mode {
            RetryMode::Blanket => self.run(cancel, self.policy.max_attempts(), op).await,
            RetryMode::IdempotentOnly => {
                self.acquire_permit(cancel, 1).await;
                op().await
            }
        }
    }

    async fn acquire_permit(&self, cancel: &CancellationToken, attempt: u32) {
        if let Some(limiter) = &self.limiter {
            // Best effort: a failed wait never aborts the call.
            if let Err(e) = limiter.acquire(cancel).await {
                warn!(error = %e, attempt, "rate limiter wait failed, continuing");
            }
        }
    }

    async fn run<T, F, Fut>(&self, cancel: &CancellationToken, max_attempts: u32, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            self.acquire_permit(cancel, attempt + 1).await;

            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !is_retryable(&e) => return Err(e),
                Err(e) => e,
            };

            attempt += 1;
            if attempt >= max_attempts {
                return Err(Error::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.backoff.compute_delay(attempt - 1);
            debug!(
                error = %err,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                "retrying after retryable error"
            );

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(Error::Cancelled { operation: "retry backoff" });
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
