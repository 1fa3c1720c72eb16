//! Scan request configuration.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::field::MetadataField;

/// Smallest accepted depth limit.
pub const MIN_DEPTH_LIMIT: u32 = 1;

/// Largest accepted depth limit.
pub const MAX_DEPTH_LIMIT: u32 = 100;

/// Depth limit used when none is given.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Everything the scanner needs to know about one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanRequest {
    /// Root directory to scan, as given by the caller.
    pub root: PathBuf,

    /// Requested fields, in caller-declared column order.
    #[builder(default = "MetadataField::all()")]
    #[serde(default = "MetadataField::all")]
    pub fields: Vec<MetadataField>,

    /// Whether `max_depth` is enforced.
    #[builder(default = "false")]
    #[serde(default)]
    pub limit_depth: bool,

    /// Directories at this depth or deeper are listed but not descended into.
    #[builder(default = "DEFAULT_MAX_DEPTH")]
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

impl ScanRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if let Some(depth) = self.max_depth {
            if !(MIN_DEPTH_LIMIT..=MAX_DEPTH_LIMIT).contains(&depth) {
                return Err(format!(
                    "Max depth must be between {MIN_DEPTH_LIMIT} and {MAX_DEPTH_LIMIT}, got {depth}"
                ));
            }
        }
        Ok(())
    }
}

impl ScanRequest {
    /// Create a new scan request builder.
    pub fn builder() -> ScanRequestBuilder {
        ScanRequestBuilder::default()
    }

    /// Create a request for all fields with no depth limit.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fields: MetadataField::all(),
            limit_depth: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// The effective depth limit, if enabled.
    pub fn depth_limit(&self) -> Option<u32> {
        self.limit_depth.then_some(self.max_depth)
    }

    /// Check the request before handing it to the scanner.
    ///
    /// The depth bound is re-checked here because requests can also arrive
    /// through deserialization, bypassing the builder.
    pub fn validate(&self) -> Result<(), RequestError> {
        if !(MIN_DEPTH_LIMIT..=MAX_DEPTH_LIMIT).contains(&self.max_depth) {
            return Err(RequestError::DepthOutOfRange {
                depth: self.max_depth,
            });
        }
        validate_root(&self.root)
    }
}

/// Check that a root exists and is a directory.
pub(crate) fn validate_root(root: &Path) -> Result<(), RequestError> {
    if root.as_os_str().is_empty() {
        return Err(RequestError::NoDirectory);
    }
    match std::fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        _ => Err(RequestError::InvalidDirectory {
            path: root.to_path_buf(),
        }),
    }
}
