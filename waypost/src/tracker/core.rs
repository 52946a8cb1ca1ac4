//! Per-sample reaction logic.
//!
//! [`Tracker`] is the synchronous core of the tracking loop: one call to
//! [`Tracker::on_sample`] per incoming sample, producing either a recorded
//! status or a sleep decision. It owns the status history and is driven from
//! a single task, so it needs no internal locking.

use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use tracing::{debug, warn};

use super::provider::StatusLog;
use super::state::Connectivity;
use crate::battery::BatteryReader;
use crate::sleep::SleepWindow;
use crate::source::Sample;
use crate::status::{HistoryOutcome, Status, StatusHistory};

/// Tracking loop configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Distance under which a candidate matches a recorded status.
    pub near_threshold_m: f64,
    /// Maximum retained statuses.
    pub max_statuses: usize,
    /// Nightly quiet window.
    pub sleep_window: SleepWindow,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            near_threshold_m: crate::status::DEFAULT_NEAR_THRESHOLD_M,
            max_statuses: crate::status::DEFAULT_CAPACITY,
            sleep_window: SleepWindow::default(),
        }
    }
}

/// What one sample produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleReaction {
    /// The sample was recorded; surface the given status text.
    Recorded {
        /// How the history absorbed the status.
        outcome: HistoryOutcome,
        /// Status text to push to the notifier.
        text: &'static str,
    },
    /// The quiet hour was hit: schedule a resume after `resume_delay` and
    /// tear the loop down. The sample itself is not processed.
    Sleep {
        /// Delay until the scheduled resume.
        resume_delay: Duration,
    },
}

/// Synchronous core of the tracking loop.
pub struct Tracker {
    config: TrackerConfig,
    history: StatusHistory,
    battery: Arc<dyn BatteryReader>,
    status_log: Option<Arc<dyn StatusLog>>,
}

impl Tracker {
    /// Create a tracker.
    ///
    /// `status_log` is the optional debug-mode sink; when `None`, recorded
    /// statuses are not persisted anywhere.
    pub fn new(
        config: TrackerConfig,
        battery: Arc<dyn BatteryReader>,
        status_log: Option<Arc<dyn StatusLog>>,
    ) -> Self {
        let history = StatusHistory::new(config.max_statuses);
        Self {
            config,
            history,
            battery,
            status_log,
        }
    }

    /// The retained status history.
    pub fn history(&self) -> &StatusHistory {
        &self.history
    }

    /// The configured quiet window.
    pub fn sleep_window(&self) -> SleepWindow {
        self.config.sleep_window
    }

    /// React to one incoming sample.
    ///
    /// `now` is the local wall-clock time of the evaluation; it is a
    /// parameter so tests can pin the quiet-hour decision.
    ///
    /// Side effects: at most one status-log append (debug mode only, best
    /// effort). The notifier push for the returned text is the caller's
    /// responsibility, exactly once per recorded sample.
    pub fn on_sample<T: Timelike>(
        &mut self,
        sample: Sample,
        connectivity: Connectivity,
        now: &T,
    ) -> SampleReaction {
        if self.config.sleep_window.is_quiet_hour(now) {
            let resume_delay = self.config.sleep_window.resume_delay();
            debug!(
                resume_delay_secs = resume_delay.as_secs(),
                "Quiet hour reached, requesting shutdown"
            );
            return SampleReaction::Sleep { resume_delay };
        }

        let status = Status::new(sample.coordinate, sample.captured_at, self.battery.read());

        let outcome = self
            .history
            .insert_or_replace(status.clone(), self.config.near_threshold_m);

        if let Some(log) = &self.status_log {
            // Best effort: a persistence failure must never crash the loop.
            if let Err(e) = log.append(&status) {
                warn!(error = %e, "Status log append failed");
            }
        }

        SampleReaction::Recorded {
            outcome,
            text: connectivity.status_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::FixedBatteryReader;
    use crate::coord::Coordinate;
    use crate::tracker::state::{TEXT_NOT_TRACKING, TEXT_TRACKING};
    use chrono::NaiveTime;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tracker() -> Tracker {
        Tracker::new(
            TrackerConfig::default(),
            Arc::new(FixedBatteryReader(80.0)),
            None,
        )
    }

    fn sample(lat: f64, lng: f64) -> Sample {
        Sample::new(Coordinate::new(lat, lng), 1_700_000_000_000)
    }

    fn daytime() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    fn quiet_time() -> NaiveTime {
        NaiveTime::from_hms_opt(1, 30, 0).unwrap()
    }

    #[test]
    fn test_sample_recorded_with_battery_level() {
        let mut tracker = tracker();
        let reaction = tracker.on_sample(sample(10.0, 20.0), Connectivity::Connected, &daytime());

        assert!(matches!(reaction, SampleReaction::Recorded { .. }));
        assert_eq!(tracker.history().len(), 1);
        assert_eq!(tracker.history().get(0).unwrap().power_level, 80.0);
    }

    #[test]
    fn test_status_text_follows_connectivity() {
        let mut tracker = tracker();
        let connected = tracker.on_sample(sample(1.0, 1.0), Connectivity::Connected, &daytime());
        let disconnected =
            tracker.on_sample(sample(2.0, 2.0), Connectivity::Disconnected, &daytime());

        assert!(matches!(
            connected,
            SampleReaction::Recorded { text: TEXT_TRACKING, .. }
        ));
        assert!(matches!(
            disconnected,
            SampleReaction::Recorded { text: TEXT_NOT_TRACKING, .. }
        ));
        // Sampling continued despite connectivity loss.
        assert_eq!(tracker.history().len(), 2);
    }

    #[test]
    fn test_quiet_hour_short_circuits_processing() {
        let mut tracker = tracker();
        let reaction = tracker.on_sample(sample(1.0, 1.0), Connectivity::Connected, &quiet_time());

        assert_eq!(
            reaction,
            SampleReaction::Sleep {
                resume_delay: Duration::from_secs(14_400)
            }
        );
        // The sample was not recorded.
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_quiet_hour_has_no_debounce() {
        let mut tracker = tracker();
        for _ in 0..3 {
            let reaction =
                tracker.on_sample(sample(1.0, 1.0), Connectivity::Connected, &quiet_time());
            assert!(matches!(reaction, SampleReaction::Sleep { .. }));
        }
    }

    /// Status log that fails every append, counting attempts.
    struct FailingLog(AtomicUsize);

    impl StatusLog for FailingLog {
        fn append(&self, _status: &Status) -> io::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_log_failure_is_swallowed() {
        let log = Arc::new(FailingLog(AtomicUsize::new(0)));
        let mut tracker = Tracker::new(
            TrackerConfig::default(),
            Arc::new(FixedBatteryReader(80.0)),
            Some(log.clone()),
        );

        let reaction = tracker.on_sample(sample(1.0, 1.0), Connectivity::Connected, &daytime());

        assert!(matches!(reaction, SampleReaction::Recorded { .. }));
        assert_eq!(log.0.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.history().len(), 1);
    }
}
