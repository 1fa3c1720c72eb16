//! JWalk-based two-pass directory scanner.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::FileType;
use std::path::{Path, PathBuf};
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use printdir_core::{ScanError, ScanRequest, ScanResult};

use crate::metadata::MetadataExtractor;
use crate::progress::{ProgressObserver, ProgressTracker};

/// Sequential scanner that counts a tree, then collects one record per entry.
///
/// Returns `Ok(None)` when the scan was cancelled; records gathered before
/// the cancellation are dropped.
#[derive(Debug, Default)]
pub struct DirectoryScanner {
    extractor: MetadataExtractor,
}

impl DirectoryScanner {
    /// Create a new scanner for the running platform.
    pub fn new() -> Self {
        Self::with_extractor(MetadataExtractor::new())
    }

    /// Create a scanner using a specific extractor.
    pub fn with_extractor(extractor: MetadataExtractor) -> Self {
        Self { extractor }
    }

    /// Run both passes.
    pub fn scan<O: ProgressObserver + ?Sized>(
        &self,
        request: &ScanRequest,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> Result<Option<ScanResult>, ScanError> {
        let start = Instant::now();

        let Some(total) = self.count(request, cancel)? else {
            debug!(root = %request.root.display(), "scan stopped during count pass");
            return Ok(None);
        };
        observer.total_known(total);

        if total == 0 {
            info!(root = %request.root.display(), "nothing to list");
            return Ok(Some(ScanResult::empty()));
        }

        let result = self.collect(request, total, cancel, observer)?;
        if let Some(ref result) = result {
            info!(
                root = %request.root.display(),
                records = result.len(),
                skipped = result.skipped,
                elapsed = ?start.elapsed(),
                "scan finished"
            );
        }
        Ok(result)
    }

    /// Count the entries the collection pass will visit.
    pub fn count(
        &self,
        request: &ScanRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<u64>, ScanError> {
        check_root(&request.root)?;
        debug!(root = %request.root.display(), limit = ?request.depth_limit(), "counting entries");

        let mut total: u64 = 0;
        for entry_result in walker(&request.root, request.depth_limit()) {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            match entry_result {
                Ok(_) => total += 1,
                Err(err) => subtree_error(&request.root, err)?,
            }
        }

        Ok(Some(total))
    }

    /// Extract metadata for every entry, reporting progress against `total`.
    fn collect<O: ProgressObserver + ?Sized>(
        &self,
        request: &ScanRequest,
        total: u64,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> Result<Option<ScanResult>, ScanError> {
        check_root(&request.root)?;
        debug!(root = %request.root.display(), total, "collecting metadata");

        let Some(listing) = listing(request, cancel)? else {
            debug!("scan stopped while listing entries");
            return Ok(None);
        };

        let mut tracker = ProgressTracker::new(total);
        let mut records = Vec::new();

        for Listed { path, file_type } in listing {
            if cancel.is_cancelled() {
                debug!(processed = tracker.processed(), "scan stopped during collection");
                return Ok(None);
            }

            // Links to directories are listed as directories but never entered.
            let is_dir = file_type.is_dir() || (file_type.is_symlink() && path.is_dir());

            let event = match self.extractor.extract(&path, &request.fields, is_dir) {
                Ok(record) => {
                    records.push(record);
                    tracker.record_processed()
                }
                Err(err) if err.is_not_found() => {
                    warn!(path = %path.display(), "skipping missing path or broken link");
                    tracker.record_skipped()
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    tracker.record_skipped()
                }
            };
            observer.progress(event);
        }

        debug!(
            entries_per_second = tracker.entries_per_second(),
            "collection pass done"
        );

        Ok(Some(ScanResult {
            total,
            records,
            skipped: tracker.skipped(),
        }))
    }
}

/// An entry found by the walker, before its metadata is read.
struct Listed {
    path: PathBuf,
    file_type: FileType,
}

/// Walk the tree and arrange its entries in listing order.
///
/// The children of one directory are listed together, then each of its
/// subdirectories is listed the same way, in order. Only paths are held
/// here; metadata is read afterwards.
fn listing(
    request: &ScanRequest,
    cancel: &CancellationToken,
) -> Result<Option<Vec<Listed>>, ScanError> {
    let mut top = Vec::new();
    let mut nested: HashMap<PathBuf, Vec<Listed>> = HashMap::new();

    for entry_result in walker(&request.root, request.depth_limit()) {
        if cancel.is_cancelled() {
            return Ok(None);
        }
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                subtree_error(&request.root, err)?;
                continue;
            }
        };

        let listed = Listed {
            path: entry.path(),
            file_type: entry.file_type(),
        };
        if entry.depth <= 1 {
            top.push(listed);
        } else {
            nested
                .entry(entry.parent_path().to_path_buf())
                .or_default()
                .push(listed);
        }
    }

    Ok(Some(listing_order(top, nested)))
}

/// Flatten per-directory groups: a group, then the groups of its
/// subdirectories, each fully, before the next sibling's.
fn listing_order(top: Vec<Listed>, mut nested: HashMap<PathBuf, Vec<Listed>>) -> Vec<Listed> {
    let mut ordered = Vec::new();
    let mut pending = vec![top];

    while let Some(group) = pending.pop() {
        let children: Vec<_> = group
            .iter()
            .filter_map(|listed| nested.remove(&listed.path))
            .collect();
        ordered.extend(group);
        pending.extend(children.into_iter().rev());
    }

    ordered
}

/// Build the walker shared by both passes.
///
/// Serial and sorted so both passes see the same entries: within each
/// directory, subdirectories before files, each group by name. A directory
/// at `max_depth` or deeper is yielded but its children are not read.
fn walker(root: &Path, max_depth: Option<u32>) -> WalkDir {
    let max_depth = max_depth.map(|d| d as usize);

    WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .min_depth(1)
        .process_read_dir(move |_depth, _path, _state, children| {
            children.sort_by(|a, b| match (a, b) {
                (Ok(a), Ok(b)) => b
                    .file_type
                    .is_dir()
                    .cmp(&a.file_type.is_dir())
                    .then_with(|| a.file_name.cmp(&b.file_name)),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => Ordering::Equal,
            });

            if let Some(max_depth) = max_depth {
                for child in children.iter_mut().flatten() {
                    if child.depth >= max_depth {
                        child.read_children_path = None;
                    }
                }
            }
        })
}

/// Fail if the root is gone or no longer a directory.
fn check_root(root: &Path) -> Result<(), ScanError> {
    let metadata = std::fs::metadata(root).map_err(|e| ScanError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// A subtree that cannot be read contributes no entries; the root itself
/// failing is fatal.
fn subtree_error(root: &Path, err: jwalk::Error) -> Result<(), ScanError> {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    if path == root {
        return Err(ScanError::Traversal {
            path: root.to_path_buf(),
            message: err.to_string(),
        });
    }
    warn!(path = %path.display(), error = %err, "skipping unreadable directory");
    Ok(())
}
