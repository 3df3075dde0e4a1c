//! Request pacing backed by governor.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::sync::Arc;
use std::time::Duration;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces consecutive calls at least one period apart.
///
/// Clones share the same limiter, so one pacer handed to every channel
/// acts as a global cap. A zero period disables pacing.
///
/// # Examples
///
/// ```
/// use enikki_rate_limit::Pacer;
/// use std::time::Duration;
///
/// let pacer = Pacer::new(Duration::from_millis(500));
/// assert!(pacer.is_enabled());
/// assert!(!Pacer::disabled().is_enabled());
/// ```
#[derive(Clone, Default)]
pub struct Pacer {
    limiter: Option<Arc<DirectRateLimiter>>,
    period: Duration,
}

impl Pacer {
    /// Pacer allowing one call per `period`.
    pub fn new(period: Duration) -> Self {
        let limiter = Quota::with_period(period).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter, period }
    }

    /// Pacer that never waits.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether calls are being spaced.
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Configured spacing.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait until the next call is allowed.
    ///
    /// The first call returns immediately.
    pub async fn pace(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("period", &self.period)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
