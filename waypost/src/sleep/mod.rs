//! Nightly quiet-window scheduling.
//!
//! The tracker suspends itself during a nightly quiet window and schedules
//! its own resume. The window is defined purely by wall-clock hour-of-day:
//! the check fires for every sample received during the configured hour,
//! with no hysteresis or debounce. In practice the first trigger tears the
//! sampling loop down, so later samples in that hour never arrive.
//!
//! Resumption is not a transition inside this module - the whole loop is
//! re-entered fresh when the externally scheduled wake fires.

use std::time::Duration;

use chrono::Timelike;

/// Default hour-of-day (local time) at which the quiet window begins.
pub const DEFAULT_SLEEP_HOUR: u32 = 1;

/// Default quiet-window duration in hours.
pub const DEFAULT_SLEEP_DURATION_HOURS: u64 = 4;

/// Tolerance window handed to the wake scheduler alongside the resume
/// deadline.
pub const RESUME_TOLERANCE: Duration = Duration::from_secs(60);

/// Configuration for the nightly quiet window.
///
/// Stateless: the decision is recomputed from wall-clock time for every
/// sample, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepWindow {
    /// Local hour-of-day (0-23) at which the quiet window begins.
    pub start_hour: u32,
    /// Quiet-window duration in whole hours.
    pub duration_hours: u64,
}

impl Default for SleepWindow {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_SLEEP_HOUR,
            duration_hours: DEFAULT_SLEEP_DURATION_HOURS,
        }
    }
}

impl SleepWindow {
    /// Create a window starting at `start_hour` local time, lasting
    /// `duration_hours`.
    pub fn new(start_hour: u32, duration_hours: u64) -> Self {
        Self {
            start_hour,
            duration_hours,
        }
    }

    /// Returns true iff `time` falls in the quiet hour.
    ///
    /// The check is a point-in-time equality on hour granularity, so it
    /// holds for the entire 60 minutes of the configured hour regardless of
    /// minute or second. Generic over [`Timelike`] so tests can pass fixed
    /// times; production passes the local time from the runtime's clock.
    #[inline]
    pub fn is_quiet_hour<T: Timelike>(&self, time: &T) -> bool {
        time.hour() == self.start_hour
    }

    /// How long after the shutdown the resume should fire.
    #[inline]
    pub fn resume_delay(&self) -> Duration {
        Duration::from_secs(self.duration_hours * 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_quiet_for_entire_configured_hour() {
        let window = SleepWindow::default();
        assert!(window.is_quiet_hour(&at(1, 0)));
        assert!(window.is_quiet_hour(&at(1, 30)));
        assert!(window.is_quiet_hour(&at(1, 59)));
    }

    #[test]
    fn test_not_quiet_outside_configured_hour() {
        let window = SleepWindow::default();
        assert!(!window.is_quiet_hour(&at(0, 59)));
        assert!(!window.is_quiet_hour(&at(2, 0)));
        assert!(!window.is_quiet_hour(&at(13, 0)));
    }

    #[test]
    fn test_default_resume_delay_is_four_hours() {
        assert_eq!(SleepWindow::default().resume_delay(), Duration::from_secs(14_400));
    }

    #[test]
    fn test_custom_window() {
        let window = SleepWindow::new(23, 6);
        assert!(window.is_quiet_hour(&at(23, 15)));
        assert!(!window.is_quiet_hour(&at(1, 0)));
        assert_eq!(window.resume_delay(), Duration::from_secs(21_600));
    }
}
