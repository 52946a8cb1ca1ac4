//! Core state types for the tracking loop.

use std::fmt;

use crate::status::Status;

/// Status text shown before the first evaluation (application-name
/// placeholder).
pub const TEXT_STARTING: &str = "waypost";

/// Status text while actively tracking with connectivity.
pub const TEXT_TRACKING: &str = "tracking";

/// Status text when stopped or without connectivity.
pub const TEXT_NOT_TRACKING: &str = "not tracking";

/// Lifecycle state of the tracking loop.
///
/// Exactly one value at any instant; transitions happen only inside the
/// tracking runtime and drive the text surfaced to the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    /// Not running. Also the terminal state after the quiet-hour shutdown.
    #[default]
    Stopped,
    /// Waiting for the location source connect to complete.
    Connecting,
    /// Receiving and processing samples.
    Tracking,
    /// Quiet hour hit; a resume has been scheduled and teardown is underway.
    Sleeping,
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Tracking => write!(f, "Tracking"),
            Self::Sleeping => write!(f, "Sleeping"),
        }
    }
}

/// Network connectivity at the moment a sample is processed.
///
/// Connectivity loss is reflected only in the surfaced status text;
/// sampling itself continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// A usable network connection exists (or is being established).
    #[default]
    Connected,
    /// No network connection.
    Disconnected,
}

impl Connectivity {
    /// The status text this connectivity maps to while tracking.
    #[inline]
    pub fn status_text(self) -> &'static str {
        match self {
            Self::Connected => TEXT_TRACKING,
            Self::Disconnected => TEXT_NOT_TRACKING,
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// Point-in-time view of the tracking loop for consumers.
#[derive(Debug, Clone)]
pub struct TrackerSnapshot {
    /// Current lifecycle state.
    pub state: TrackingState,
    /// Most recently surfaced status text.
    pub status_text: String,
    /// Retained statuses, most recent first.
    pub statuses: Vec<Status>,
}
