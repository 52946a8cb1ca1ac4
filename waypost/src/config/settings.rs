//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file. These are
//! pure data types; parsing lives in the parser module.

use std::path::PathBuf;
use std::time::Duration;

use crate::sleep::SleepWindow;
use crate::source::LocationRequest;
use crate::status;
use crate::tracker::TrackerConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Tracking loop settings
    pub tracking: TrackingSettings,
    /// Nightly quiet-window settings
    pub sleep: SleepSettings,
    /// Status-log settings
    pub logging: LoggingSettings,
    /// Location source settings
    pub source: SourceSettings,
}

/// Tracking loop configuration.
#[derive(Debug, Clone)]
pub struct TrackingSettings {
    /// Desired seconds between position fixes
    pub interval_secs: u64,
    /// Fastest allowable seconds between fixes
    pub fastest_interval_secs: u64,
    /// Distance in meters under which two fixes count as the same place
    pub near_threshold_meters: f64,
    /// Maximum retained statuses
    pub max_statuses: usize,
    /// Persisted auto-resume flag, read once at cold start. Tracking starts
    /// automatically when this is false (preserved inverted check).
    pub is_tracked: bool,
}

/// Quiet-window configuration.
#[derive(Debug, Clone)]
pub struct SleepSettings {
    /// Local hour-of-day (0-23) at which the quiet window begins
    pub start_hour: u32,
    /// Quiet-window duration in whole hours
    pub duration_hours: u64,
}

/// Status-log configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Whether recorded statuses are appended to the status log
    pub status_log: bool,
    /// Status log file path
    pub status_log_path: PathBuf,
}

/// Location source configuration.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// UDP port the bundled location source listens on
    pub udp_port: u16,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            tracking: TrackingSettings {
                interval_secs: 10,
                fastest_interval_secs: 5,
                near_threshold_meters: status::DEFAULT_NEAR_THRESHOLD_M,
                max_statuses: status::DEFAULT_CAPACITY,
                is_tracked: false,
            },
            sleep: SleepSettings {
                start_hour: crate::sleep::DEFAULT_SLEEP_HOUR,
                duration_hours: crate::sleep::DEFAULT_SLEEP_DURATION_HOURS,
            },
            logging: LoggingSettings {
                status_log: false,
                status_log_path: super::config_dir().join("status-log.txt"),
            },
            source: SourceSettings { udp_port: 48600 },
        }
    }
}

impl ConfigFile {
    /// The quiet window these settings describe.
    pub fn sleep_window(&self) -> SleepWindow {
        SleepWindow::new(self.sleep.start_hour, self.sleep.duration_hours)
    }

    /// The location request these settings describe.
    pub fn location_request(&self) -> LocationRequest {
        LocationRequest {
            interval: Duration::from_secs(self.tracking.interval_secs),
            fastest_interval: Duration::from_secs(self.tracking.fastest_interval_secs),
            ..Default::default()
        }
    }

    /// The tracker configuration these settings describe.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            near_threshold_m: self.tracking.near_threshold_meters,
            max_statuses: self.tracking.max_statuses,
            sleep_window: self.sleep_window(),
        }
    }
}
