//! Collection window calculation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Length of the default collection window.
pub const DEFAULT_WINDOW_DAYS: NonZeroU32 = NonZeroU32::new(7).unwrap();

/// Closed time interval `[start, end]` that bounds one digest run.
///
/// The run is expected to fire on a fixed weekly schedule, so the invocation
/// time is the upper bound and no schedule state is kept.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use enikki_core::TimeWindow;
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 2, 3, 0, 0).unwrap();
/// let window = TimeWindow::week_ending(now);
///
/// assert_eq!(*window.end(), now);
/// assert_eq!(*window.start(), now - Duration::days(7));
/// assert!(window.contains(now - Duration::days(3)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct TimeWindow {
    /// Inclusive lower bound
    start: DateTime<Utc>,
    /// Inclusive upper bound
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window covering the seven days that end at `now`.
    pub fn week_ending(now: DateTime<Utc>) -> Self {
        Self::ending_at(now, DEFAULT_WINDOW_DAYS)
    }

    /// Window covering `days` days that end at `now`.
    ///
    /// `days` is non-zero, so `start < end` always holds. A start earlier
    /// than chrono can represent saturates at [`DateTime::<Utc>::MIN_UTC`].
    pub fn ending_at(now: DateTime<Utc>, days: NonZeroU32) -> Self {
        let start = now
            .checked_sub_signed(Duration::days(i64::from(days.get())))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    /// Whether `timestamp` lies inside the closed window.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// Whether `timestamp` is strictly older than the window.
    ///
    /// History is walked newest-first, so the first such timestamp ends
    /// collection for a channel.
    pub fn is_before_start(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp < self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bounds_are_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 1, 7, 3, 0, 0).unwrap();
        let window = TimeWindow::week_ending(now);

        assert!(window.contains(*window.start()));
        assert!(window.contains(*window.end()));
        assert!(!window.contains(now + Duration::seconds(1)));
        assert!(window.is_before_start(*window.start() - Duration::seconds(1)));
        assert!(!window.is_before_start(*window.start()));
    }

    #[test]
    fn custom_length_window() {
        let now = Utc.with_ymd_and_hms(2024, 1, 7, 3, 0, 0).unwrap();
        let window = TimeWindow::ending_at(now, NonZeroU32::new(1).unwrap());

        assert_eq!(*window.start(), now - Duration::days(1));
        assert!(window.start() < window.end());
    }

    #[test]
    fn huge_window_saturates_instead_of_overflowing() {
        let now = Utc.with_ymd_and_hms(2024, 1, 7, 3, 0, 0).unwrap();
        let window = TimeWindow::ending_at(now, NonZeroU32::MAX);

        assert_eq!(*window.start(), DateTime::<Utc>::MIN_UTC);
        assert!(window.contains(now - Duration::days(365)));
    }
}
