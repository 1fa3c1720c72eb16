//! Directory traversal and metadata extraction for printdir.
//!
//! # Overview
//!
//! `printdir-scan` walks a directory tree and produces one
//! [`EntryRecord`] per file or directory. A scan runs in two passes over the
//! same jwalk configuration:
//!
//! - **Count pass** establishes the progress total without touching metadata
//! - **Collect pass** stats every entry and extracts the requested fields
//!
//! Both passes prune identically when a depth limit is set, check a
//! cooperative [`CancellationToken`] between entries, and skip entries that
//! cannot be read instead of failing the scan.
//!
//! # Example
//!
//! ```rust,no_run
//! use printdir_scan::{DirectoryScanner, ScanRequest};
//! use tokio_util::sync::CancellationToken;
//!
//! let request = ScanRequest::new("/path/to/scan");
//! let scanner = DirectoryScanner::new();
//! let result = scanner
//!     .scan(&request, &CancellationToken::new(), &mut ())
//!     .unwrap()
//!     .expect("not cancelled");
//!
//! println!("{} entries", result.len());
//! ```
//!
//! # Background Scans
//!
//! [`start_scan`] runs the scan on a blocking task and reports through a
//! channel:
//!
//! ```rust,no_run
//! use printdir_scan::{start_scan, ScanEvent, ScanRequest};
//!
//! # async fn run() {
//! let mut session = start_scan(ScanRequest::new("/path/to/scan"));
//! while let Some(event) = session.recv().await {
//!     match event {
//!         ScanEvent::TotalKnown(total) => println!("{total} entries"),
//!         ScanEvent::Progress(p) => println!("{} of {}", p.processed, p.total),
//!         ScanEvent::Completed(result) => println!("done: {}", result.len()),
//!         ScanEvent::Failed(err) => eprintln!("{err}"),
//!     }
//! }
//! # }
//! ```

mod metadata;
mod owner;
mod progress;
mod scanner;
mod session;

pub use metadata::{MetadataExtractor, PlatformCapabilities, extract};
pub use owner::OwnerResolver;
pub use progress::{ProgressObserver, ProgressTracker};
pub use scanner::DirectoryScanner;
pub use session::{ScanEvent, ScanSession, start_scan, start_scan_with};

pub use tokio_util::sync::CancellationToken;

// Re-export core types for convenience
pub use printdir_core::{
    EntryRecord, ExtractError, FieldValue, MetadataField, ProgressEvent, ScanError, ScanRequest,
    ScanResult,
};

/// Channel buffer size for scan events.
pub const SCAN_CHANNEL_SIZE: usize = 100;
