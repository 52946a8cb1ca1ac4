//! UDP location source.
//!
//! Listens for plain-text UDP datagrams carrying position fixes and forwards
//! them as [`SourceEvent`]s. One datagram is one fix:
//!
//! ```text
//! lat,lon[,epoch_millis]
//! ```
//!
//! When the timestamp is omitted the receive time is used. Malformed or
//! out-of-range datagrams are logged at debug level and dropped - a noisy
//! peer must not disturb the tracking loop.
//!
//! # Example
//!
//! ```ignore
//! let (tx, rx) = mpsc::channel(16);
//! let source = UdpLocationSource::new(UdpLocationSourceConfig::default(), tx);
//! let handle = source.start();
//! // rx now yields SourceEvent::Connected followed by samples
//! ```

use std::time::{Duration, Instant};

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::{LocationRequest, Sample, SourceError, SourceEvent};
use crate::coord::Coordinate;

/// Maximum datagram size we expect.
const MAX_PACKET_SIZE: usize = 256;

/// UDP source configuration.
#[derive(Debug, Clone)]
pub struct UdpLocationSourceConfig {
    /// UDP port to listen on.
    pub port: u16,
    /// Requested update cadence; `fastest_interval` rate-limits delivery.
    pub request: LocationRequest,
}

impl Default for UdpLocationSourceConfig {
    fn default() -> Self {
        Self {
            port: 48600,
            request: LocationRequest::default(),
        }
    }
}

/// Location source listening for text datagrams on a UDP socket.
///
/// Emits [`SourceEvent::Connected`] once the socket is bound, then one
/// [`SourceEvent::Sample`] per accepted datagram, rate-limited to the
/// request's fastest interval.
pub struct UdpLocationSource {
    config: UdpLocationSourceConfig,
    event_tx: mpsc::Sender<SourceEvent>,
}

impl UdpLocationSource {
    /// Create a new UDP source.
    pub fn new(config: UdpLocationSourceConfig, event_tx: mpsc::Sender<SourceEvent>) -> Self {
        Self { config, event_tx }
    }

    /// The configured listen port.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Start the source.
    ///
    /// Spawns the listener task; the connect itself is asynchronous and its
    /// completion is reported as [`SourceEvent::Connected`] on the event
    /// channel. A bind failure surfaces through the join handle.
    pub fn start(self) -> tokio::task::JoinHandle<Result<(), SourceError>> {
        tokio::spawn(self.run())
    }

    async fn run(self) -> Result<(), SourceError> {
        let socket = UdpSocket::bind(("0.0.0.0", self.config.port))
            .await
            .map_err(|e| SourceError::SocketBind {
                port: self.config.port,
                source: e,
            })?;

        info!(port = self.config.port, "UDP location source listening");

        if self.event_tx.send(SourceEvent::Connected).await.is_err() {
            debug!("Event channel closed before connect completed");
            return Ok(());
        }

        let fastest = self.config.request.fastest_interval;
        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let mut last_forward: Option<Instant> = None;
        let mut datagrams: u64 = 0;
        let mut forwarded: u64 = 0;

        loop {
            if self.event_tx.is_closed() {
                debug!(datagrams, forwarded, "Event channel closed, stopping UDP source");
                return Ok(());
            }

            let received =
                tokio::time::timeout(Duration::from_millis(500), socket.recv(&mut buffer)).await;

            let len = match received {
                Ok(Ok(len)) => len,
                Ok(Err(e)) => {
                    debug!(error = %e, "UDP receive error");
                    continue;
                }
                // Timeout: loop back around to re-check the channel.
                Err(_) => continue,
            };

            datagrams += 1;
            let Some(sample) = parse_datagram(&buffer[..len]) else {
                continue;
            };

            // Honor the fastest allowable update interval.
            if let Some(last) = last_forward {
                if last.elapsed() < fastest {
                    trace!("Dropping fix inside fastest interval");
                    continue;
                }
            }

            if self.event_tx.send(SourceEvent::Sample(sample)).await.is_err() {
                return Ok(());
            }
            last_forward = Some(Instant::now());
            forwarded += 1;
        }
    }
}

/// Parse one `lat,lon[,epoch_millis]` datagram.
///
/// Returns `None` for malformed text, out-of-range coordinates, or a
/// non-numeric timestamp.
fn parse_datagram(data: &[u8]) -> Option<Sample> {
    let text = std::str::from_utf8(data).ok()?;
    let text = text.trim();

    let mut parts = text.split(',');
    let latitude: f64 = parts.next()?.trim().parse().ok()?;
    let longitude: f64 = parts.next()?.trim().parse().ok()?;

    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        debug!(%coordinate, "Dropping out-of-range fix");
        return None;
    }

    let captured_at = match parts.next() {
        Some(raw) => raw.trim().parse().ok()?,
        None => chrono::Utc::now().timestamp_millis(),
    };

    Some(Sample::new(coordinate, captured_at))
}
