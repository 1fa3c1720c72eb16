//! Export error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors writing a listing.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination could not be created.
    #[error("Cannot create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the destination failed.
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV writer failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Unrecognised format name or file extension.
    #[error("Unknown export format: {name} (expected csv, html or json)")]
    UnknownFormat { name: String },
}

impl ExportError {
    pub(crate) fn create(path: &Path, source: std::io::Error) -> Self {
        Self::Create {
            path: path.to_path_buf(),
            source,
        }
    }
}
