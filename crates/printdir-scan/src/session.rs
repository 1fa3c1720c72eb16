//! Background scans with channel-based progress.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use printdir_core::{ProgressEvent, ScanError, ScanRequest, ScanResult};

use crate::SCAN_CHANNEL_SIZE;
use crate::progress::ProgressObserver;
use crate::scanner::DirectoryScanner;

/// Messages sent from a background scan.
///
/// `TotalKnown` arrives at most once and before any `Progress`. A scan ends
/// with exactly one `Completed` or `Failed`, unless it was stopped, in which
/// case the channel closes without a terminal message.
#[derive(Debug)]
pub enum ScanEvent {
    /// The counting pass finished.
    TotalKnown(u64),
    /// One more entry was handled.
    Progress(ProgressEvent),
    /// The scan finished without interruption.
    Completed(ScanResult),
    /// The scan hit an unrecoverable error.
    Failed(ScanError),
}

impl ScanEvent {
    /// Check if this event ends the scan.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}

/// Handle to a scan running on a background task.
#[derive(Debug)]
pub struct ScanSession {
    events: mpsc::Receiver<ScanEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ScanSession {
    /// Wait for the next event. Returns `None` once the scan has ended.
    pub async fn recv(&mut self) -> Option<ScanEvent> {
        self.events.recv().await
    }

    /// Ask the scan to stop at its next check point.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Check if a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A token that stops this scan when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Check if the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Start a scan on a blocking background task.
///
/// Must be called from within a tokio runtime.
pub fn start_scan(request: ScanRequest) -> ScanSession {
    start_scan_with(request, DirectoryScanner::new())
}

/// Start a scan with a specific scanner.
pub fn start_scan_with(request: ScanRequest, scanner: DirectoryScanner) -> ScanSession {
    let (tx, rx) = mpsc::channel(SCAN_CHANNEL_SIZE);
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();

    let task = tokio::spawn(async move {
        let progress_tx = tx.clone();
        let scan_cancel = task_cancel.clone();

        // jwalk and stat calls block, so the scan itself runs off the runtime
        let result = tokio::task::spawn_blocking(move || {
            let mut observer = ChannelObserver::new(progress_tx, scan_cancel.clone());
            scanner.scan(&request, &scan_cancel, &mut observer)
        })
        .await
        .unwrap_or_else(|e| {
            Err(ScanError::Other {
                message: e.to_string(),
            })
        });

        let event = match result {
            Ok(Some(result)) => ScanEvent::Completed(result),
            Ok(None) => {
                debug!("scan stopped, no result sent");
                return;
            }
            Err(err) => ScanEvent::Failed(err),
        };
        let _ = tx.send(event).await;
    });

    ScanSession {
        events: rx,
        cancel,
        task,
    }
}

/// Forwards progress into the session channel.
///
/// If the receiving side is gone nobody can observe the result, so the scan
/// is stopped.
struct ChannelObserver {
    tx: mpsc::Sender<ScanEvent>,
    cancel: CancellationToken,
}

impl ChannelObserver {
    fn new(tx: mpsc::Sender<ScanEvent>, cancel: CancellationToken) -> Self {
        Self { tx, cancel }
    }

    fn send(&self, event: ScanEvent) {
        if self.tx.blocking_send(event).is_err() {
            self.cancel.cancel();
        }
    }
}

impl ProgressObserver for ChannelObserver {
    fn total_known(&mut self, total: u64) {
        self.send(ScanEvent::TotalKnown(total));
    }

    fn progress(&mut self, event: ProgressEvent) {
        self.send(ScanEvent::Progress(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_session_event_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("b.txt"), "bb").unwrap();

        let mut session = start_scan(ScanRequest::new(temp.path()));
        let mut events = Vec::new();
        while let Some(event) = session.recv().await {
            events.push(event);
        }

        assert!(matches!(events[0], ScanEvent::TotalKnown(2)));
        assert!(matches!(events[1], ScanEvent::Progress(p) if p.processed == 1));
        assert!(matches!(events[2], ScanEvent::Progress(p) if p.processed == 2));
        assert!(matches!(&events[3], ScanEvent::Completed(r) if r.len() == 2));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[tokio::test]
    async fn test_session_failure() {
        let temp = TempDir::new().unwrap();
        let mut session = start_scan(ScanRequest::new(temp.path().join("missing")));

        let event = session.recv().await.unwrap();
        assert!(matches!(event, ScanEvent::Failed(ScanError::NotFound { .. })));
        assert!(session.recv().await.is_none());
    }
}
