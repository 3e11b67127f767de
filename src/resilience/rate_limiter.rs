use crate::{Error, Result};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Longest single sleep in `acquire`; the wait is recomputed after waking.
const MAX_WAIT: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct RateLimiterSnapshot {
    pub rps: f64,
    pub burst: f64,
    pub tokens: f64,
    /// Estimated wait time until a token is available (ms), if currently empty.
    pub estimated_wait_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Tokens per second. Zero disables limiting.
    pub rps: f64,
    /// Maximum burst size (tokens).
    pub burst: f64,
}

impl RateLimiterConfig {
    /// Conservative reading of a 60 requests/minute upstream limit: one permit per
    /// second with a burst of five.
    pub fn new() -> Self {
        Self {
            rps: 1.0,
            burst: 5.0,
        }
    }

    pub fn from_rps(rps: f64) -> Option<Self> {
        if !rps.is_finite() || rps < 0.0 {
            return None;
        }
        Some(Self {
            rps,
            burst: rps.max(1.0),
        })
    }

    /// Set the maximum tokens (burst size)
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.burst = tokens.max(1) as f64;
        self
    }

    /// Set the refill rate (tokens per second)
    pub fn with_refill_rate(mut self, rate: f64) -> Self {
        if rate.is_finite() && rate >= 0.0 {
            self.rps = rate;
        }
        self
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct State {
    tokens: f64,
    last: Instant,
}

/// Token-bucket rate limiter shared by every call made through one client.
///
/// The bucket starts full, so up to `burst` calls proceed immediately; after
/// that calls are spaced at the steady rate. The lock is held only for the
/// refill-and-take step, never across a sleep.
pub struct RateLimiter {
    cfg: RateLimiterConfig,
    state: Mutex<State>,
}

impl RateLimiter {
    pub fn new(cfg: RateLimiterConfig) -> Self {
        let burst = cfg.burst;
        let state = Mutex::new(State {
            tokens: burst,
            last: Instant::now(),
        });
        Self { cfg, state }
    }

    fn refill_locked(cfg: &RateLimiterConfig, st: &mut State) {
        let now = Instant::now();
        let elapsed = now.duration_since(st.last).as_secs_f64();
        if elapsed > 0.0 {
            st.tokens = (st.tokens + elapsed * cfg.rps).min(cfg.burst);
            st.last = now;
        }
    }

    /// Take one token or report how long until one is available.
    async fn take_or_wait(&self) -> Option<Duration> {
        let cfg = &self.cfg;
        if cfg.rps <= 0.0 {
            return None;
        }

        let mut st = self.state.lock().await;
        Self::refill_locked(cfg, &mut st);
        if st.tokens >= 1.0 {
            st.tokens -= 1.0;
            return None;
        }
        let missing = 1.0 - st.tokens;
        let wait = Duration::try_from_secs_f64(missing / cfg.rps).unwrap_or(MAX_WAIT);
        Some(wait.min(MAX_WAIT))
    }

    /// Acquire one token, sleeping as needed.
    ///
    /// Returns [`Error::Cancelled`] if `cancel` fires before a token is granted.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<()> {
        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled {
                    operation: "rate limiter acquire",
                });
            }

            let wait = match self.take_or_wait().await {
                None => return Ok(()),
                Some(wait) => wait,
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(Error::Cancelled {
                        operation: "rate limiter acquire",
                    });
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Try to acquire a token without waiting, returns true if successful
    pub async fn try_acquire(&self) -> bool {
        self.take_or_wait().await.is_none()
    }

    pub async fn snapshot(&self) -> RateLimiterSnapshot {
        let cfg = &self.cfg;
        let mut st = self.state.lock().await;

        let mut wait_ms = None;
        if cfg.rps > 0.0 {
            Self::refill_locked(cfg, &mut st);
            if st.tokens < 1.0 {
                let missing = 1.0 - st.tokens;
                wait_ms = Some((missing / cfg.rps * 1000.0) as u64);
            }
        }

        RateLimiterSnapshot {
            rps: cfg.rps,
            burst: cfg.burst,
            tokens: st.tokens,
            estimated_wait_ms: wait_ms,
        }
    }
}
