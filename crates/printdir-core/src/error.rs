//! Error types for requests, scanning and metadata extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for the root.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Root path not found (e.g. removed while scanning).
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The walker could not read the root.
    #[error("Failed to traverse {path}: {message}")]
    Traversal { path: PathBuf, message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors reading metadata for a single entry. Never fatal to a scan.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The entry vanished or is a broken link.
    #[error("Missing path or broken link: {path}")]
    NotFound { path: PathBuf },

    /// Any other stat failure.
    #[error("Cannot read metadata for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Classify a stat failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Check whether the entry no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Problems with a request, reported before any scanning starts.
#[derive(Debug, Error)]
pub enum RequestError {
    /// No root was supplied.
    #[error("No directory selected for processing")]
    NoDirectory,

    /// The root does not exist or is not a directory.
    #[error("No directory selected or directory is invalid: {path}")]
    InvalidDirectory { path: PathBuf },

    /// Depth limit outside the accepted range.
    #[error("Max depth must be between 1 and 100, got {depth}")]
    DepthOutOfRange { depth: u32 },

    /// A field name that does not match any metadata column.
    #[error("Unknown metadata field: {name}")]
    UnknownField { name: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl From<crate::request::ScanRequestBuilderError> for RequestError {
    fn from(err: crate::request::ScanRequestBuilderError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));
    }

    #[test]
    fn test_extract_error_classification() {
        let missing = ExtractError::io(
            "/test/gone",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(missing.is_not_found());

        let denied = ExtractError::io(
            "/test/locked",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!denied.is_not_found());
        assert!(denied.to_string().contains("/test/locked"));
    }

    #[test]
    fn test_request_error_messages() {
        let err = RequestError::InvalidDirectory {
            path: PathBuf::from("/nope"),
        };
        assert!(err.to_string().contains("invalid"));
        assert!(RequestError::DepthOutOfRange { depth: 0 }
            .to_string()
            .contains("between 1 and 100"));
    }
}
