//! Tracking runtime.
//!
//! The runtime owns the single consumer task that reads [`SourceEvent`]s
//! from a location source and drives the [`Tracker`] core. All mutation of
//! the history and tracking state happens on that one task; consumers read
//! through a shared snapshot and a broadcast channel of status-text updates.
//!
//! # Lifecycle
//!
//! 1. **Start**: the runtime begins in `Connecting` with the application-name
//!    placeholder surfaced; the source's connect completion
//!    ([`SourceEvent::Connected`]) moves it to `Tracking` and acquires the
//!    wake lock.
//! 2. **Operation**: one reaction per sample; exactly one notifier update
//!    per processed sample.
//! 3. **Sleep**: the quiet hour schedules a resume via the wake scheduler,
//!    then runs the same teardown as an explicit stop. Resumption re-enters
//!    the whole loop fresh, driven externally.
//! 4. **Stop**: teardown is unconditional and idempotent - status text set
//!    to "not tracking", notification cleared, wake lock released exactly
//!    once, even when called repeatedly or when nothing was ever acquired.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::core::{SampleReaction, Tracker};
use super::provider::{Clock, ConnectivityMonitor, Notifier, WakeLock, WakeScheduler};
use super::state::{TrackerSnapshot, TrackingState, TEXT_NOT_TRACKING, TEXT_STARTING};
use crate::sleep::RESUME_TOLERANCE;
use crate::source::SourceEvent;

/// Capacity of the status-text broadcast channel.
const BROADCAST_CAPACITY: usize = 16;

/// External collaborators handed to the runtime.
pub struct TrackerCollaborators {
    /// Sink for status-text updates.
    pub notifier: Arc<dyn Notifier>,
    /// One-shot resume scheduling.
    pub wake_scheduler: Arc<dyn WakeScheduler>,
    /// Suspension-preventing resource held while tracking.
    pub wake_lock: Arc<dyn WakeLock>,
    /// Per-sample connectivity probe.
    pub connectivity: Arc<dyn ConnectivityMonitor>,
    /// Local-time source for the quiet-hour decision.
    pub clock: Arc<dyn Clock>,
}

/// Why the sample loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Explicit stop or runtime shutdown.
    Stopped,
    /// The quiet hour triggered the overnight shutdown; a resume is
    /// scheduled.
    Sleeping,
    /// The location source closed its event channel.
    SourceClosed,
}

/// Shared mutable state behind the runtime handle.
struct Shared {
    tracker: Tracker,
    state: TrackingState,
    status_text: String,
    stop_reason: Option<StopReason>,
}

/// State owned jointly by the loop task and the handle.
struct Inner {
    shared: RwLock<Shared>,
    notifier: Arc<dyn Notifier>,
    wake_lock: Arc<dyn WakeLock>,
    lock_held: AtomicBool,
    torn_down: AtomicBool,
    broadcast_tx: broadcast::Sender<String>,
}

impl Inner {
    fn set_status_text(&self, text: &str) {
        {
            let mut shared = self.shared.write().unwrap();
            shared.status_text.clear();
            shared.status_text.push_str(text);
        }
        self.notifier.update(text);
        // Subscribers may lag or be absent; last write wins either way.
        let _ = self.broadcast_tx.send(text.to_string());
    }

    fn set_state(&self, state: TrackingState) {
        self.shared.write().unwrap().state = state;
    }

    /// Idempotent teardown: safe to call any number of times, from the loop
    /// task or from `stop()`, whether or not the wake lock was ever taken.
    fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.set_status_text(TEXT_NOT_TRACKING);
        self.notifier.clear();
        if self.lock_held.swap(false, Ordering::SeqCst) {
            self.wake_lock.release();
        }
        self.set_state(TrackingState::Stopped);
        info!("Tracking stopped");
    }
}

/// Handle to a running tracking loop.
///
/// Cloneable; all clones observe the same loop.
#[derive(Clone)]
pub struct TrackerRuntime {
    inner: Arc<Inner>,
    shutdown_token: CancellationToken,
    stopped_token: CancellationToken,
    loop_handle: Arc<std::sync::Mutex<Option<JoinHandle<()>>>>,
}

impl TrackerRuntime {
    /// Start the tracking loop.
    ///
    /// `events` is the channel fed by an already-started location source.
    /// The runtime immediately surfaces the starting placeholder text and
    /// enters `Connecting`; it moves to `Tracking` when the source reports
    /// its connect completion.
    pub fn start(
        tracker: Tracker,
        events: mpsc::Receiver<SourceEvent>,
        collaborators: TrackerCollaborators,
    ) -> Self {
        let TrackerCollaborators {
            notifier,
            wake_scheduler,
            wake_lock,
            connectivity,
            clock,
        } = collaborators;

        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        let inner = Arc::new(Inner {
            shared: RwLock::new(Shared {
                tracker,
                state: TrackingState::Connecting,
                status_text: String::new(),
                stop_reason: None,
            }),
            notifier,
            wake_lock,
            lock_held: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
            broadcast_tx,
        });

        info!("Starting tracking loop");
        inner.set_status_text(TEXT_STARTING);

        let shutdown_token = CancellationToken::new();
        let stopped_token = CancellationToken::new();

        let loop_inner = Arc::clone(&inner);
        let loop_shutdown = shutdown_token.clone();
        let loop_stopped = stopped_token.clone();
        let loop_handle = tokio::spawn(async move {
            run_loop(
                loop_inner,
                events,
                wake_scheduler,
                connectivity,
                clock,
                loop_shutdown,
            )
            .await;
            loop_stopped.cancel();
        });

        Self {
            inner,
            shutdown_token,
            stopped_token,
            loop_handle: Arc::new(std::sync::Mutex::new(Some(loop_handle))),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrackingState {
        self.inner.shared.read().unwrap().state
    }

    /// Why the loop ended, once it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.inner.shared.read().unwrap().stop_reason
    }

    /// Point-in-time snapshot of state, status text, and history.
    pub fn snapshot(&self) -> TrackerSnapshot {
        let shared = self.inner.shared.read().unwrap();
        TrackerSnapshot {
            state: shared.state,
            status_text: shared.status_text.clone(),
            statuses: shared.tracker.history().to_vec(),
        }
    }

    /// Subscribe to status-text updates.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Completes once the sample loop has ended (stop, sleep, or source
    /// loss) and teardown has run.
    pub async fn stopped(&self) {
        self.stopped_token.cancelled().await;
    }

    /// Stop the loop and tear down.
    ///
    /// Idempotent: calling this twice (or after the loop already tore
    /// itself down for the quiet hour) performs the teardown exactly once
    /// and never double-releases the wake lock.
    pub async fn stop(&self) {
        self.shutdown_token.cancel();
        let handle = self.loop_handle.lock().unwrap().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Tracking loop task panicked");
            }
        }
        // Normally the loop already tore down on exit; this covers a
        // panicked loop task.
        self.inner.teardown();
    }
}

/// The single consumer task.
async fn run_loop(
    inner: Arc<Inner>,
    mut events: mpsc::Receiver<SourceEvent>,
    wake_scheduler: Arc<dyn WakeScheduler>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
) {
    let reason = loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => break StopReason::Stopped,
            event = events.recv() => event,
        };

        match event {
            None => {
                debug!("Location source channel closed");
                break StopReason::SourceClosed;
            }
            Some(SourceEvent::Connected) => {
                info!("Location source connected, tracking");
                inner.set_state(TrackingState::Tracking);
                // Acquired once per active-tracking session; a reconnect
                // after suspension must not double-acquire.
                if !inner.lock_held.swap(true, Ordering::SeqCst) {
                    inner.wake_lock.acquire();
                }
                inner.set_status_text(super::state::TEXT_TRACKING);
            }
            Some(SourceEvent::Suspended) => {
                warn!("Location source suspended, waiting for reconnect");
                inner.set_state(TrackingState::Connecting);
            }
            Some(SourceEvent::Sample(sample)) => {
                let now = clock.now();
                let conn = connectivity.connectivity();
                let reaction = {
                    let mut shared = inner.shared.write().unwrap();
                    shared.tracker.on_sample(sample, conn, &now)
                };
                match reaction {
                    SampleReaction::Recorded { outcome, text } => {
                        debug!(?outcome, "Status recorded");
                        inner.set_status_text(text);
                    }
                    SampleReaction::Sleep { resume_delay } => {
                        info!(
                            resume_delay_secs = resume_delay.as_secs(),
                            "Overnight shutdown, resume scheduled"
                        );
                        inner.set_state(TrackingState::Sleeping);
                        wake_scheduler.schedule_resume(resume_delay, RESUME_TOLERANCE);
                        break StopReason::Sleeping;
                    }
                }
            }
        }
    };

    inner.shared.write().unwrap().stop_reason = Some(reason);
    inner.teardown();
}
