//! 弹性模块：限流、错误分类、退避与重试执行。
//!
//! # Resilience Primitives Module
//!
//! Every upstream call made by [`crate::OpenAiClient`] goes through the
//! [`retry::RetryExecutor`], which composes the pieces below.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`rate_limiter`] | Token bucket bounding request rate and burst |
//! | [`classify`] | Decides whether a failed call is retryable |
//! | [`backoff`] | Exponential delay with injectable jitter |
//! | [`retry`] | Rate-limit → call → classify → back off → retry loop |
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use terraform_provider_openai::resilience::rate_limiter::{RateLimiter, RateLimiterConfig};
//! use terraform_provider_openai::resilience::retry::{RetryExecutor, RetryPolicy};
//!
//! let limiter = Arc::new(RateLimiter::new(RateLimiterConfig::new()));
//! let executor = RetryExecutor::new(RetryPolicy::new(
//!     3,
//!     Duration::from_millis(200),
//!     Duration::from_secs(5),
//! ))
//! .with_rate_limiter(limiter);
//! assert_eq!(executor.policy().max_attempts(), 3);
//! ```

pub mod backoff;
pub mod classify;
pub mod rate_limiter;
pub mod retry;

pub use backoff::{Backoff, FixedJitter, JitterSource, UniformJitter};
pub use classify::is_retryable;
pub use rate_limiter::{RateLimiter, RateLimiterConfig, RateLimiterSnapshot};
pub use retry::{RetryExecutor, RetryMode, RetryPolicy};
