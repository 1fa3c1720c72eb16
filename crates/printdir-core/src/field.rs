//! Metadata fields and their values.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::RequestError;

/// Marker written when a field cannot be resolved for an entry.
pub const NOT_APPLICABLE: &str = "N/A";

/// A metadata column that can be requested for every entry.
///
/// The display name is used both as the column header and as the record key,
/// so it must stay stable across releases.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum MetadataField {
    #[serde(rename = "File Name")]
    #[strum(serialize = "File Name")]
    FileName,

    #[serde(rename = "Path")]
    #[strum(serialize = "Path")]
    Path,

    #[serde(rename = "Size")]
    #[strum(serialize = "Size")]
    Size,

    #[serde(rename = "Creation Time")]
    #[strum(serialize = "Creation Time")]
    CreationTime,

    #[serde(rename = "Modification Time")]
    #[strum(serialize = "Modification Time")]
    ModificationTime,

    #[serde(rename = "Access Time")]
    #[strum(serialize = "Access Time")]
    AccessTime,

    #[serde(rename = "Type")]
    #[strum(serialize = "Type")]
    Type,

    #[serde(rename = "Owner")]
    #[strum(serialize = "Owner")]
    Owner,

    #[serde(rename = "Permissions")]
    #[strum(serialize = "Permissions")]
    Permissions,
}

impl MetadataField {
    /// All fields in canonical table order.
    pub fn all() -> Vec<MetadataField> {
        Self::iter().collect()
    }

    /// Column header / record key for this field.
    pub fn name(&self) -> &str {
        self.as_ref()
    }

    /// Parse a comma-separated list of display names, keeping caller order.
    ///
    /// Blank items are ignored and repeated names are kept once.
    pub fn parse_list(list: &str) -> Result<Vec<MetadataField>, RequestError> {
        let mut fields = Vec::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let field: MetadataField = name.parse().map_err(|_| RequestError::UnknownField {
                name: name.to_string(),
            })?;
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        Ok(fields)
    }
}

/// The value of one field in an entry record.
///
/// Sizes are numbers; everything else is text. An empty text value marks a
/// field that applies to the request but not to this entry (e.g. the size of
/// a directory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(u64),
    Text(String),
}

impl FieldValue {
    /// The empty value.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Check if this is the empty value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
