//! Recorded statuses and the bounded status history.
//!
//! A [`Status`] is one accepted position observation enriched with the power
//! level at capture time. [`StatusHistory`] keeps the most recent statuses in
//! a fixed-capacity, most-recent-first buffer and decides, per candidate,
//! whether the device has meaningfully moved.

mod history;

pub use history::{HistoryOutcome, StatusHistory, DEFAULT_CAPACITY, DEFAULT_NEAR_THRESHOLD_M};

use std::fmt;

use crate::coord::Coordinate;

/// One recorded position observation.
///
/// Created from a raw sample plus a battery reading; owned by the history
/// once inserted and never mutated afterwards except through the in-place
/// replace path of [`StatusHistory::insert_or_replace`].
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    /// Position at capture time.
    pub coordinate: Coordinate,
    /// Capture time as epoch milliseconds.
    pub captured_at: i64,
    /// Device charge percentage (0-100), or a negative sentinel when the
    /// reading was unavailable.
    pub power_level: f32,
}

impl Status {
    /// Create a status record.
    pub fn new(coordinate: Coordinate, captured_at: i64, power_level: f32) -> Self {
        Self {
            coordinate,
            captured_at,
            power_level,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat={:.6} lng={:.6} time={} power={:.1}",
            self.coordinate.latitude, self.coordinate.longitude, self.captured_at, self.power_level
        )
    }
}
