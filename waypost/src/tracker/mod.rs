//! Tracking loop module.
//!
//! Orchestrates one reaction per incoming position sample: the quiet-hour
//! check, status construction, history update, optional status-log append,
//! and the notifier push. The loop is split into a synchronous core
//! ([`Tracker`]) and an async runtime ([`TrackerRuntime`]) that owns the
//! consumer task and the collaborator seams.
//!
//! # Components
//!
//! - [`state`] - `TrackingState`, `Connectivity`, snapshot and status texts
//! - [`Tracker`] - per-sample reaction logic
//! - [`Notifier`], [`WakeScheduler`], [`StatusLog`], [`WakeLock`],
//!   [`ConnectivityMonitor`], [`Clock`] - collaborator traits
//! - [`FileStatusLog`] - append-only file sink for recorded statuses
//! - [`TrackerRuntime`] - event loop and lifecycle

mod core;
mod provider;
mod runtime;
pub mod state;
mod status_log;

pub use core::{SampleReaction, Tracker, TrackerConfig};
pub use provider::{
    Clock, ConnectivityMonitor, FixedClock, NoopNotifier, NoopWakeLock, NoopWakeScheduler,
    Notifier, StaticConnectivity, StatusLog, SystemClock, WakeLock, WakeScheduler,
};
pub use runtime::{StopReason, TrackerCollaborators, TrackerRuntime};
pub use state::{
    Connectivity, TrackerSnapshot, TrackingState, TEXT_NOT_TRACKING, TEXT_STARTING, TEXT_TRACKING,
};
pub use status_log::FileStatusLog;
