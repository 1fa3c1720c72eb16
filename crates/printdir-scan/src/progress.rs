//! Scan progress reporting.

use std::time::{Duration, Instant};

use printdir_core::ProgressEvent;

/// Receives progress signals from a running scan.
///
/// `total_known` is called at most once, before any `progress` call.
pub trait ProgressObserver {
    /// The counting pass finished with `total` entries.
    fn total_known(&mut self, total: u64);

    /// One more entry was handled during the collection pass.
    fn progress(&mut self, event: ProgressEvent);
}

/// Discards all progress.
impl ProgressObserver for () {
    fn total_known(&mut self, _total: u64) {}

    fn progress(&mut self, _event: ProgressEvent) {}
}

impl<T: ProgressObserver + ?Sized> ProgressObserver for &mut T {
    fn total_known(&mut self, total: u64) {
        (**self).total_known(total);
    }

    fn progress(&mut self, event: ProgressEvent) {
        (**self).progress(event);
    }
}

/// Running counters for the collection pass.
#[derive(Debug)]
pub struct ProgressTracker {
    start_time: Instant,
    total: u64,
    processed: u64,
    skipped: u64,
}

impl ProgressTracker {
    /// Start tracking against a known total.
    pub fn new(total: u64) -> Self {
        Self {
            start_time: Instant::now(),
            total,
            processed: 0,
            skipped: 0,
        }
    }

    /// Record an entry whose metadata was collected.
    pub fn record_processed(&mut self) -> ProgressEvent {
        self.processed += 1;
        self.snapshot()
    }

    /// Record an entry that was counted but could not be read.
    pub fn record_skipped(&mut self) -> ProgressEvent {
        self.skipped += 1;
        self.record_processed()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Time elapsed since tracking started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Calculate throughput in entries per second.
    pub fn entries_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.processed as f64 / secs
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> ProgressEvent {
        ProgressEvent::new(self.processed, self.total)
    }
}
