//! Bounded most-recent-first status history.

use std::collections::VecDeque;

use tracing::debug;

use super::Status;
use crate::coord::{distance_meters, Coordinate};

/// Default maximum number of retained statuses.
pub const DEFAULT_CAPACITY: usize = 10;

/// Default distance under which two positions count as the same place.
pub const DEFAULT_NEAR_THRESHOLD_M: f64 = 20.0;

/// What [`StatusHistory::insert_or_replace`] did with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// The candidate overwrote the most recent status in place.
    Replaced,
    /// The candidate was prepended as a new status.
    Inserted {
        /// True if the oldest status was evicted to make room.
        evicted: bool,
    },
}

/// Fixed-capacity, most-recent-first buffer of [`Status`] records.
///
/// Index 0 is always the most recently accepted status. Length never exceeds
/// capacity; when a genuinely new position arrives at capacity, the oldest
/// (tail) entry is evicted.
///
/// # Deduplication policy
///
/// A stationary device overwrites its single most recent status repeatedly
/// instead of flooding the buffer with near-duplicates, while real movement
/// grows the rolling window. The replace branch requires the candidate to be
/// within threshold of *both* of the two most recent entries - a two-sample
/// confirmation so a single noisy fix cannot collapse history prematurely.
/// Note the closeness test is candidate-vs-history for both slots, not
/// slot-vs-slot, and therefore never fires until the history holds at least
/// two entries. This asymmetry is intentional, preserved behavior.
#[derive(Debug, Clone)]
pub struct StatusHistory {
    entries: VecDeque<Status>,
    capacity: usize,
}

impl Default for StatusHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl StatusHistory {
    /// Create an empty history with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Number of retained statuses.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no statuses have been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained statuses.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The status at `index`, where 0 is the most recent.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Status> {
        self.entries.get(index)
    }

    /// Iterate statuses, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Status> {
        self.entries.iter()
    }

    /// Snapshot of the current contents, most recent first.
    pub fn to_vec(&self) -> Vec<Status> {
        self.entries.iter().cloned().collect()
    }

    /// Returns true iff the status at `index` exists and lies within
    /// `threshold_m` meters of `candidate`.
    ///
    /// Out-of-bounds indexes are simply "not near" - callers probe slots 0
    /// and 1 without checking the length first.
    pub fn is_near(&self, index: usize, candidate: Coordinate, threshold_m: f64) -> bool {
        let Some(status) = self.entries.get(index) else {
            return false;
        };
        let distance = distance_meters(status.coordinate, candidate);
        debug!(index, distance_m = format!("{distance:.1}"), "Distance from recorded status");
        distance < threshold_m
    }

    /// Record a candidate status, either in place or as a new entry.
    ///
    /// If the candidate is within `threshold_m` of both slot 0 and slot 1,
    /// the most recent status is overwritten in place and the history does
    /// not grow. Otherwise the candidate is prepended and the tail is evicted
    /// while the buffer is at capacity.
    pub fn insert_or_replace(&mut self, status: Status, threshold_m: f64) -> HistoryOutcome {
        let candidate = status.coordinate;
        if self.is_near(1, candidate, threshold_m) && self.is_near(0, candidate, threshold_m) {
            self.entries[0] = status;
            HistoryOutcome::Replaced
        } else {
            let mut evicted = false;
            while self.entries.len() >= self.capacity {
                self.entries.pop_back();
                evicted = true;
            }
            self.entries.push_front(status);
            HistoryOutcome::Inserted { evicted }
        }
    }
}
