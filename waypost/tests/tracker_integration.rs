//! Integration tests for the tracking loop.
//!
//! These tests run the complete flow: UDP location source → tracking
//! runtime → status history, notifier, and teardown.
//!
//! Run with: `cargo test --test tracker_integration`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::TimeZone;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

use waypost::battery::FixedBatteryReader;
use waypost::sleep::SleepWindow;
use waypost::source::{
    LocationRequest, UdpLocationSource, UdpLocationSourceConfig,
};
use waypost::tracker::{
    Connectivity, FixedClock, NoopWakeLock, NoopWakeScheduler, Notifier, StaticConnectivity,
    Tracker, TrackerCollaborators, TrackerConfig, TrackerRuntime, TrackingState,
    TEXT_NOT_TRACKING,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Notifier recording every surfaced status text.
#[derive(Default)]
struct RecordingNotifier {
    updates: Mutex<Vec<String>>,
    cleared: Mutex<bool>,
}

impl Notifier for RecordingNotifier {
    fn update(&self, text: &str) {
        self.updates.lock().unwrap().push(text.to_string());
    }

    fn clear(&self) {
        *self.cleared.lock().unwrap() = true;
    }
}

/// Clock pinned to a midday instant, well clear of the overnight quiet
/// window used by the harness tracker.
fn midday_clock() -> FixedClock {
    FixedClock(chrono::Local.with_ymd_and_hms(2024, 6, 15, 13, 30, 0).unwrap())
}

/// Pick a free UDP port by binding an ephemeral socket.
async fn free_udp_port() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket.local_addr().unwrap().port()
}

struct Harness {
    runtime: TrackerRuntime,
    notifier: Arc<RecordingNotifier>,
    sender: UdpSocket,
    port: u16,
}

/// Start a UDP source and tracking runtime wired together.
async fn start_harness() -> Harness {
    let port = free_udp_port().await;

    let (event_tx, event_rx) = mpsc::channel(32);
    let source = UdpLocationSource::new(
        UdpLocationSourceConfig {
            port,
            request: LocationRequest {
                // No rate limiting in tests.
                fastest_interval: Duration::from_millis(0),
                ..Default::default()
            },
        },
        event_tx,
    );
    let _source_handle = source.start();

    let notifier = Arc::new(RecordingNotifier::default());
    let tracker = Tracker::new(
        TrackerConfig {
            sleep_window: SleepWindow::new(1, 4),
            ..Default::default()
        },
        Arc::new(FixedBatteryReader(64.0)),
        None,
    );
    let runtime = TrackerRuntime::start(
        tracker,
        event_rx,
        TrackerCollaborators {
            notifier: notifier.clone(),
            wake_scheduler: Arc::new(NoopWakeScheduler),
            wake_lock: Arc::new(NoopWakeLock),
            connectivity: Arc::new(StaticConnectivity(Connectivity::Connected)),
            clock: Arc::new(midday_clock()),
        },
    );

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    Harness {
        runtime,
        notifier,
        sender,
        port,
    }
}

impl Harness {
    async fn send(&self, datagram: &str) {
        self.sender
            .send_to(datagram.as_bytes(), ("127.0.0.1", self.port))
            .await
            .unwrap();
    }

    async fn wait_for(&self, mut condition: impl FnMut(&TrackerRuntime) -> bool) {
        for _ in 0..300 {
            if condition(&self.runtime) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within 3s");
    }
}

// ============================================================================
// End-to-End Flow
// ============================================================================

#[tokio::test]
async fn test_udp_fix_becomes_recorded_status() {
    let harness = start_harness().await;

    harness
        .wait_for(|rt| rt.state() == TrackingState::Tracking)
        .await;

    harness.send("53.630278,9.988333,1700000000000").await;
    harness.wait_for(|rt| !rt.snapshot().statuses.is_empty()).await;

    let snapshot = harness.runtime.snapshot();
    assert_eq!(snapshot.statuses.len(), 1);
    let status = &snapshot.statuses[0];
    assert_eq!(status.coordinate.latitude, 53.630278);
    assert_eq!(status.captured_at, 1_700_000_000_000);
    assert_eq!(status.power_level, 64.0);
    assert_eq!(snapshot.status_text, "tracking");

    harness.runtime.stop().await;
}

#[tokio::test]
async fn test_movement_grows_history_most_recent_first() {
    let harness = start_harness().await;
    harness
        .wait_for(|rt| rt.state() == TrackingState::Tracking)
        .await;

    // Three far-apart fixes.
    harness.send("0.0,0.0,1").await;
    harness.wait_for(|rt| rt.snapshot().statuses.len() == 1).await;
    harness.send("10.0,0.0,2").await;
    harness.wait_for(|rt| rt.snapshot().statuses.len() == 2).await;
    harness.send("20.0,0.0,3").await;
    harness.wait_for(|rt| rt.snapshot().statuses.len() == 3).await;

    let statuses = harness.runtime.snapshot().statuses;
    assert_eq!(statuses[0].captured_at, 3);
    assert_eq!(statuses[1].captured_at, 2);
    assert_eq!(statuses[2].captured_at, 1);

    harness.runtime.stop().await;
}

#[tokio::test]
async fn test_stationary_device_replaces_head_after_two_fixes() {
    let harness = start_harness().await;
    harness
        .wait_for(|rt| rt.state() == TrackingState::Tracking)
        .await;

    // Three fixes within a few meters of each other. The third lands on the
    // replace path, so the history stays at two entries with a fresh head.
    harness.send("0.0,0.0,1").await;
    harness.wait_for(|rt| rt.snapshot().statuses.len() == 1).await;
    harness.send("0.00004,0.0,2").await;
    harness.wait_for(|rt| rt.snapshot().statuses.len() == 2).await;
    harness.send("0.00008,0.0,3").await;
    harness
        .wait_for(|rt| rt.snapshot().statuses.first().map(|s| s.captured_at) == Some(3))
        .await;

    let statuses = harness.runtime.snapshot().statuses;
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].captured_at, 3);
    assert_eq!(statuses[1].captured_at, 1);

    harness.runtime.stop().await;
}

#[tokio::test]
async fn test_malformed_datagrams_are_ignored() {
    let harness = start_harness().await;
    harness
        .wait_for(|rt| rt.state() == TrackingState::Tracking)
        .await;

    harness.send("garbage").await;
    harness.send("999.0,0.0").await;
    harness.send("1.0,2.0,42").await;

    harness.wait_for(|rt| !rt.snapshot().statuses.is_empty()).await;
    let statuses = harness.runtime.snapshot().statuses;
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].captured_at, 42);

    harness.runtime.stop().await;
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test]
async fn test_stop_surfaces_not_tracking_and_clears_notifier() {
    let harness = start_harness().await;
    harness
        .wait_for(|rt| rt.state() == TrackingState::Tracking)
        .await;

    harness.runtime.stop().await;
    harness.runtime.stop().await;

    assert_eq!(harness.runtime.state(), TrackingState::Stopped);
    assert!(*harness.notifier.cleared.lock().unwrap());
    let updates = harness.notifier.updates.lock().unwrap();
    assert_eq!(updates.last().map(String::as_str), Some(TEXT_NOT_TRACKING));
    // Teardown notified exactly once despite the double stop.
    assert_eq!(
        updates.iter().filter(|t| *t == TEXT_NOT_TRACKING).count(),
        1
    );
}
