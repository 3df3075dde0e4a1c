//! Bounded retry and request pacing.
//!
//! - [`with_retry`] runs a fallible async operation under a [`RetryPolicy`],
//!   reporting each failed attempt to a [`RetryObserver`].
//! - [`Pacer`] spaces out consecutive calls with a governor limiter so paged
//!   history fetches stay under the platform rate cap.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pacer;
mod retry;

pub use pacer::Pacer;
pub use retry::{
    RetryExhausted, RetryObserver, RetryPolicy, TracingObserver, with_retry, with_retry_if,
};
