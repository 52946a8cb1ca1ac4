//! In-process wake scheduling.
//!
//! [`TokioWakeScheduler`] implements the [`WakeScheduler`] seam with a
//! single pending tokio timer. Scheduling a resume while one is pending
//! replaces the pending one (update-current semantics). When the timer
//! fires it signals a watcher channel; the embedding process re-enters the
//! tracking loop fresh from there.
//!
//! The tolerance window is advisory for this implementation - an in-process
//! timer fires at the deadline - but it is logged so the request is visible.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::tracker::WakeScheduler;

/// Wake scheduler backed by a single pending tokio timer.
pub struct TokioWakeScheduler {
    pending: Mutex<Option<CancellationToken>>,
    resume_tx: mpsc::Sender<()>,
}

impl TokioWakeScheduler {
    /// Create a scheduler and the channel on which resume firings are
    /// delivered.
    pub fn new() -> (Self, mpsc::Receiver<()>) {
        let (resume_tx, resume_rx) = mpsc::channel(1);
        (
            Self {
                pending: Mutex::new(None),
                resume_tx,
            },
            resume_rx,
        )
    }

    /// True if a resume is currently pending.
    #[cfg(test)]
    fn has_pending(&self) -> bool {
        self.pending.lock().unwrap().is_some()
    }
}

impl WakeScheduler for TokioWakeScheduler {
    fn schedule_resume(&self, delay: Duration, window: Duration) {
        let token = CancellationToken::new();
        {
            let mut pending = self.pending.lock().unwrap();
            if let Some(prior) = pending.replace(token.clone()) {
                debug!("Replacing pending resume");
                prior.cancel();
            }
        }

        info!(
            delay_secs = delay.as_secs(),
            window_secs = window.as_secs(),
            "Resume scheduled"
        );

        let resume_tx = self.resume_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    info!("Resume timer fired");
                    // A full channel means a resume is already waiting to be
                    // consumed; collapsing the two is fine.
                    let _ = resume_tx.try_send(());
                }
                _ = token.cancelled() => {}
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resume_fires_after_delay() {
        let (scheduler, mut resume_rx) = TokioWakeScheduler::new();
        scheduler.schedule_resume(Duration::from_millis(20), Duration::from_secs(60));

        let fired = tokio::time::timeout(Duration::from_secs(2), resume_rx.recv()).await;
        assert_eq!(fired, Ok(Some(())));
    }

    #[tokio::test]
    async fn test_reschedule_replaces_pending_resume() {
        let (scheduler, mut resume_rx) = TokioWakeScheduler::new();
        // First request would fire much later; the second replaces it.
        scheduler.schedule_resume(Duration::from_secs(3600), Duration::from_secs(60));
        scheduler.schedule_resume(Duration::from_millis(20), Duration::from_secs(60));

        let fired = tokio::time::timeout(Duration::from_secs(2), resume_rx.recv()).await;
        assert_eq!(fired, Ok(Some(())));

        // Nothing else pending: the first request was cancelled, so no
        // second firing arrives.
        let extra =
            tokio::time::timeout(Duration::from_millis(100), resume_rx.recv()).await;
        assert!(extra.is_err());
    }

    #[tokio::test]
    async fn test_has_pending_after_schedule() {
        let (scheduler, _resume_rx) = TokioWakeScheduler::new();
        assert!(!scheduler.has_pending());
        scheduler.schedule_resume(Duration::from_secs(3600), Duration::from_secs(60));
        assert!(scheduler.has_pending());
    }
}
