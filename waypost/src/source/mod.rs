//! Location sources.
//!
//! A location source delivers timestamped coordinate samples over an mpsc
//! channel after an asynchronous connect. The connect is two-phase: the
//! source emits [`SourceEvent::Connected`] once it is actually delivering
//! fixes, and the runtime stays in `Connecting` until then.
//!
//! The bundled [`UdpLocationSource`] listens for plain-text UDP datagrams;
//! platform location providers plug in by feeding the same event channel.

mod udp;

pub use udp::{UdpLocationSource, UdpLocationSourceConfig};

use std::time::Duration;

use crate::coord::Coordinate;

/// One raw position observation from a location source.
///
/// Ephemeral: consumed once by the tracking loop and either discarded or
/// promoted to a [`Status`](crate::status::Status).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Position of the fix.
    pub coordinate: Coordinate,
    /// Fix time as epoch milliseconds.
    pub captured_at: i64,
}

impl Sample {
    /// Create a sample.
    pub fn new(coordinate: Coordinate, captured_at: i64) -> Self {
        Self {
            coordinate,
            captured_at,
        }
    }
}

/// Requested update cadence and accuracy for a location source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRequest {
    /// Desired interval between fixes.
    pub interval: Duration,
    /// Fastest interval the consumer is willing to receive.
    pub fastest_interval: Duration,
    /// Requested fix accuracy.
    pub priority: Priority,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            fastest_interval: Duration::from_secs(5),
            priority: Priority::HighAccuracy,
        }
    }
}

/// Fix accuracy requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// Best available accuracy, highest power cost.
    #[default]
    HighAccuracy,
    /// Coarse accuracy, lower power cost.
    BalancedPower,
}

/// Events delivered by a location source to the tracking runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceEvent {
    /// The source is connected and will start delivering samples.
    Connected,
    /// One position fix.
    Sample(Sample),
    /// The source connection was suspended; fixes stop until it reconnects.
    Suspended,
}

/// Errors raised while starting a location source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Failed to bind the UDP listen socket.
    #[error("Failed to bind UDP socket on port {port}: {source}")]
    SocketBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}
