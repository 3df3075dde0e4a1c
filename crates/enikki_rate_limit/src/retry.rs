//! Fixed-interval bounded retry.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};

/// How many times to attempt an operation and how long to wait in between.
///
/// # Examples
///
/// ```
/// use enikki_rate_limit::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::fixed(3, Duration::from_secs(2)).unwrap();
/// assert_eq!(policy.max_attempts().get(), 3);
/// assert_eq!(policy.backoff(), Duration::from_secs(2));
///
/// assert!(RetryPolicy::fixed(0, Duration::ZERO).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RetryPolicy {
    /// Total attempts including the first
    max_attempts: NonZeroUsize,
    /// Delay between attempts in milliseconds
    #[getter(skip)]
    backoff_ms: u64,
}

impl RetryPolicy {
    /// Policy with `max_attempts` attempts spaced `backoff` apart.
    ///
    /// Returns `None` if `max_attempts` is zero.
    pub fn fixed(max_attempts: usize, backoff: Duration) -> Option<Self> {
        Some(Self {
            max_attempts: NonZeroUsize::new(max_attempts)?,
            backoff_ms: u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
        })
    }

    /// A single attempt with no retry.
    pub fn once() -> Self {
        Self {
            max_attempts: NonZeroUsize::MIN,
            backoff_ms: 0,
        }
    }

    /// Delay between attempts.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}

/// Receives retry lifecycle events.
///
/// Injected into [`with_retry`] so the combinator itself never logs.
pub trait RetryObserver: Send + Sync {
    /// An attempt failed. `attempt` is 1-based.
    fn attempt_failed(
        &self,
        operation: &str,
        attempt: usize,
        max_attempts: usize,
        error: &dyn Display,
    );

    /// Every attempt failed.
    fn exhausted(&self, operation: &str, attempts: usize, error: &dyn Display) {
        let _ = (operation, attempts, error);
    }
}

/// Observer that reports retry events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn attempt_failed(
        &self,
        operation: &str,
        attempt: usize,
        max_attempts: usize,
        error: &dyn Display,
    ) {
        tracing::warn!(
            operation,
            attempt,
            max_attempts,
            error = %error,
            "Attempt failed"
        );
    }

    fn exhausted(&self, operation: &str, attempts: usize, error: &dyn Display) {
        tracing::error!(operation, attempts, error = %error, "All attempts failed");
    }
}

/// Error returned when every attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// Number of attempts made
    pub attempts: usize,
    /// Error of the final attempt
    pub last_error: E,
}

/// Run `attempt_fn` until it succeeds or the policy's attempts are used up.
///
/// `attempt_fn` receives the 1-based attempt number. Every error counts as
/// transient; attempts are separated by the policy's fixed backoff.
///
/// # Errors
///
/// Returns [`RetryExhausted`] carrying the final attempt's error.
///
/// # Examples
///
/// ```
/// use enikki_rate_limit::{RetryPolicy, TracingObserver, with_retry};
/// use std::time::Duration;
///
/// # tokio_test_block_on(async {
/// let policy = RetryPolicy::fixed(3, Duration::ZERO).unwrap();
/// let value = with_retry(&policy, &TracingObserver, "demo", |attempt| async move {
///     if attempt < 2 { Err("not yet") } else { Ok(attempt) }
/// })
/// .await
/// .unwrap();
/// assert_eq!(value, 2);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f)
/// # }
/// ```
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    observer: &dyn RetryObserver,
    operation: &str,
    attempt_fn: F,
) -> Result<T, RetryExhausted<E>>
where
    E: Display,
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    with_retry_if(policy, observer, operation, |_: &E| true, attempt_fn).await
}

/// Like [`with_retry`], but stops early on errors `is_transient` rejects.
///
/// # Errors
///
/// Returns [`RetryExhausted`] carrying the error that ended the loop, either
/// the first permanent one or the final attempt's.
pub async fn with_retry_if<T, E, P, F, Fut>(
    policy: &RetryPolicy,
    observer: &dyn RetryObserver,
    operation: &str,
    is_transient: P,
    mut attempt_fn: F,
) -> Result<T, RetryExhausted<E>>
where
    E: Display,
    P: Fn(&E) -> bool,
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts().get();
    let attempts = AtomicUsize::new(0);
    let strategy = FixedInterval::new(policy.backoff()).take(max_attempts - 1);
    let is_transient = &is_transient;

    let result = Retry::spawn(strategy, || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let fut = attempt_fn(attempt);
        async move {
            match fut.await {
                Ok(value) => Ok(value),
                Err(err) => {
                    observer.attempt_failed(operation, attempt, max_attempts, &err);
                    if is_transient(&err) {
                        Err(RetryError::Transient {
                            err,
                            retry_after: None,
                        })
                    } else {
                        Err(RetryError::Permanent(err))
                    }
                }
            }
        }
    })
    .await;

    result.map_err(|last_error| {
        let attempts = attempts.load(Ordering::SeqCst);
        observer.exhausted(operation, attempts, &last_error);
        RetryExhausted {
            attempts,
            last_error,
        }
    })
}
