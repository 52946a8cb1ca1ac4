//! Collaborator traits for the tracking loop.
//!
//! The loop's external collaborators are thin seams:
//!
//! - [`Notifier`] - sink for status-text updates (last write wins)
//! - [`WakeScheduler`] - one-shot future activation with a tolerance window
//! - [`StatusLog`] - append-only sink for recorded statuses (debug mode)
//! - [`WakeLock`] - resource preventing the host from suspending sampling
//! - [`ConnectivityMonitor`] - per-sample network connectivity probe
//! - [`Clock`] - local-time source for the quiet-hour decision
//!
//! Noop and fixed implementations are provided for tests and headless use.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::status::Status;
use crate::tracker::state::Connectivity;

/// Sink for status-text updates.
///
/// Called on every processed sample and on start/stop. Implementations must
/// be idempotent/always-latest: the last written text wins.
pub trait Notifier: Send + Sync {
    /// Surface the given status text.
    fn update(&self, text: &str);

    /// Remove the surfaced status entirely (persistent notification
    /// cancelled on teardown). Default is a no-op.
    fn clear(&self) {}
}

/// One-shot future activation capability.
///
/// Fire-and-forget: the loop never awaits confirmation that the scheduled
/// task will eventually run. Scheduling again replaces any prior pending
/// request (update-current semantics).
pub trait WakeScheduler: Send + Sync {
    /// Request execution no earlier than `delay` from now, within
    /// `delay..delay + window`.
    fn schedule_resume(&self, delay: Duration, window: Duration);
}

/// Append-only sink for recorded statuses.
///
/// Used in debug mode only; append failures are non-fatal and swallowed by
/// the caller.
pub trait StatusLog: Send + Sync {
    /// Append one status record.
    fn append(&self, status: &Status) -> io::Result<()>;
}

/// Resource preventing the host from suspending active sampling.
///
/// The runtime guarantees acquire is called at most once per tracking
/// session and release exactly once on teardown, so implementations need
/// not guard against double calls themselves.
pub trait WakeLock: Send + Sync {
    /// Take the lock.
    fn acquire(&self);

    /// Release the lock.
    fn release(&self);
}

/// Per-sample network connectivity probe.
pub trait ConnectivityMonitor: Send + Sync {
    /// Current connectivity.
    fn connectivity(&self) -> Connectivity;
}

/// Local-time source consulted once per sample for the quiet-hour decision.
pub trait Clock: Send + Sync {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;
}

/// Notifier that drops all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn update(&self, _text: &str) {}
}

/// Wake scheduler that drops all requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWakeScheduler;

impl WakeScheduler for NoopWakeScheduler {
    fn schedule_resume(&self, _delay: Duration, _window: Duration) {}
}

/// Wake lock that holds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&self) {}
    fn release(&self) {}
}

/// Connectivity monitor returning a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub Connectivity);

impl ConnectivityMonitor for StaticConnectivity {
    fn connectivity(&self) -> Connectivity {
        self.0
    }
}

/// Clock reading the system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock returning a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
