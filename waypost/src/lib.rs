//! Waypost - device position tracking daemon
//!
//! This library samples a device's position from an asynchronous location
//! source, decides whether each fix represents a meaningful change of
//! location, keeps a bounded most-recent-first history of recorded statuses,
//! and suspends itself during a nightly quiet window, scheduling its own
//! resume.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use waypost::battery::SysfsBatteryReader;
//! use waypost::source::{UdpLocationSource, UdpLocationSourceConfig};
//! use waypost::tracker::{
//!     NoopNotifier, NoopWakeLock, NoopWakeScheduler, StaticConnectivity,
//!     SystemClock, Tracker, TrackerCollaborators, TrackerConfig, TrackerRuntime,
//! };
//!
//! let (event_tx, event_rx) = mpsc::channel(16);
//! let source = UdpLocationSource::new(UdpLocationSourceConfig::default(), event_tx);
//! let _source_handle = source.start();
//!
//! let tracker = Tracker::new(
//!     TrackerConfig::default(),
//!     Arc::new(SysfsBatteryReader::default()),
//!     None,
//! );
//! let runtime = TrackerRuntime::start(tracker, event_rx, TrackerCollaborators {
//!     notifier: Arc::new(NoopNotifier),
//!     wake_scheduler: Arc::new(NoopWakeScheduler),
//!     wake_lock: Arc::new(NoopWakeLock),
//!     connectivity: Arc::new(StaticConnectivity(Default::default())),
//!     clock: Arc::new(SystemClock),
//! });
//! ```

pub mod battery;
pub mod config;
pub mod coord;
pub mod logging;
pub mod sleep;
pub mod source;
pub mod status;
pub mod tracker;
pub mod wake;

/// Version of the Waypost library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
