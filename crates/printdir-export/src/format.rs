//! Output format selection.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ExportError;

/// The artifact types a listing can be saved as.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    /// Comma separated values.
    #[default]
    Csv,
    /// A web page with one table.
    Html,
    /// Structured data.
    Json,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "html",
            Self::Json => "json",
        }
    }

    /// Parse a format name such as `"csv"` or `"JSON"`.
    pub fn parse(name: &str) -> Result<Self, ExportError> {
        Self::from_str(name.trim()).map_err(|_| ExportError::UnknownFormat {
            name: name.to_string(),
        })
    }

    /// Infer the format from a file extension. `.htm` counts as HTML.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "htm" => Some(Self::Html),
            other => Self::from_str(other).ok(),
        }
    }

    /// Default file name for a listing of `root`: `<dirname>_listing.<ext>`.
    pub fn default_file_name(&self, root: &Path) -> String {
        let stem = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "output".to_string());
        format!("{stem}_listing.{}", self.extension())
    }
}
