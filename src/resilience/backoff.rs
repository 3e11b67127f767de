//! Exponential backoff with injectable jitter.

use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Source of the multiplicative jitter factor applied to each delay.
pub trait JitterSource: Send + Sync {
    fn factor(&self) -> f64;
}

/// Uniform jitter in `[low, high]` drawn from the thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct UniformJitter {
    low: f64,
    high: f64,
}

impl UniformJitter {
    pub fn new(low: f64, high: f64) -> Self {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        Self {
            low: low.max(0.0),
            high: high.max(0.0),
        }
    }
}

impl Default for UniformJitter {
    fn default() -> Self {
        Self::new(0.8, 1.2)
    }
}

impl JitterSource for UniformJitter {
    fn factor(&self) -> f64 {
        if self.low == self.high {
            return self.low;
        }
        rand::thread_rng().gen_range(self.low..=self.high)
    }
}

/// Constant jitter factor, for deterministic delays.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn factor(&self) -> f64 {
        self.0
    }
}

#[derive(Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    jitter: Arc<dyn JitterSource>,
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backoff")
            .field("initial", &self.initial)
            .field("max", &self.max)
            .finish()
    }
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
            jitter: Arc::new(UniformJitter::default()),
        }
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn max_delay(&self) -> Duration {
        self.max
    }

    /// `initial * 2^attempt * jitter`, clamped to `[0, max]`. `attempt` is 0-based.
    pub fn compute_delay(&self, attempt: u32) -> Duration {
        let cap = self.max.as_secs_f64();
        let exp = 2f64.powi(attempt.min(1023) as i32);
        let raw = self.initial.as_secs_f64() * exp * self.jitter.factor();
        if !raw.is_finite() || raw >= cap {
            return self.max;
        }
        Duration::from_secs_f64(raw.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(initial_ms: u64, max_ms: u64, factor: f64) -> Backoff {
        Backoff::new(
            Duration::from_millis(initial_ms),
            Duration::from_millis(max_ms),
        )
        .with_jitter(Arc::new(FixedJitter(factor)))
    }

    #[test]
    fn test_exponential_growth_without_jitter() {
        let b = fixed(1000, 30_000, 1.0);
        assert_eq!(b.compute_delay(0), Duration::from_millis(1000));
        assert_eq!(b.compute_delay(1), Duration::from_millis(2000));
        assert_eq!(b.compute_delay(2), Duration::from_millis(4000));
        assert_eq!(b.compute_delay(4), Duration::from_millis(16_000));
        assert_eq!(b.compute_delay(5), Duration::from_millis(30_000));
    }

    #[test]
    fn test_monotonic_until_cap_for_fixed_jitter() {
        for factor in [0.8, 1.0, 1.2] {
            let b = fixed(100, 5_000, factor);
            let mut prev = Duration::ZERO;
            for attempt in 0..64 {
                let d = b.compute_delay(attempt);
                assert!(d >= prev, "attempt {} regressed", attempt);
                assert!(d <= Duration::from_millis(5_000));
                prev = d;
            }
            assert_eq!(prev, Duration::from_millis(5_000));
        }
    }

    #[test]
    fn test_huge_attempt_saturates_to_cap() {
        let b = fixed(1000, 30_000, 1.2);
        assert_eq!(b.compute_delay(u32::MAX), Duration::from_millis(30_000));
    }

    #[test]
    fn test_uniform_jitter_stays_in_bounds() {
        let b = Backoff::new(Duration::from_millis(1000), Duration::from_secs(60));
        for _ in 0..200 {
            let d = b.compute_delay(0);
            assert!(d >= Duration::from_millis(800), "{:?}", d);
            assert!(d <= Duration::from_millis(1200), "{:?}", d);
        }
    }

    #[test]
    fn test_max_is_raised_to_initial() {
        let b = Backoff::new(Duration::from_secs(2), Duration::from_secs(1));
        assert_eq!(b.max_delay(), Duration::from_secs(2));
    }
}
