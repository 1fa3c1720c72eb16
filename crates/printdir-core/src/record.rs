//! Entry records, scan results and progress events.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::field::{FieldValue, MetadataField};

/// Metadata collected for a single file or directory.
///
/// Keys keep their insertion order, which is the order they are serialized
/// in. Only requested fields are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryRecord {
    values: IndexMap<MetadataField, FieldValue>,
}

impl EntryRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, keeping the original position if already present.
    pub fn insert(&mut self, field: MetadataField, value: impl Into<FieldValue>) {
        self.values.insert(field, value.into());
    }

    /// Builder-style variant of [`EntryRecord::insert`].
    pub fn with(mut self, field: MetadataField, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Get the value of a field.
    pub fn get(&self, field: MetadataField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Render a field as a cell; missing fields render as an empty string.
    pub fn cell(&self, field: MetadataField) -> String {
        self.get(field).map(ToString::to_string).unwrap_or_default()
    }

    /// Check whether a field is present.
    pub fn contains(&self, field: MetadataField) -> bool {
        self.values.contains_key(&field)
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Fields present in this record, in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = MetadataField> + '_ {
        self.values.keys().copied()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of this record restricted to the given fields.
    pub fn restricted_to(&self, fields: &[MetadataField]) -> Self {
        Self {
            values: self
                .values
                .iter()
                .filter(|(field, _)| fields.contains(field))
                .map(|(field, value)| (*field, value.clone()))
                .collect(),
        }
    }
}

/// Outcome of a completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Entry count established by the counting pass.
    pub total: u64,
    /// Records in traversal order.
    pub records: Vec<EntryRecord>,
    /// Entries that were counted but could not be read.
    pub skipped: u64,
}

impl ScanResult {
    /// Create an empty result for a tree with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of records collected.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records were collected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the result, returning the records.
    pub fn into_records(self) -> Vec<EntryRecord> {
        self.records
    }
}

/// Progress through the collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Entries handled so far, including skipped ones.
    pub processed: u64,
    /// Total established by the counting pass.
    pub total: u64,
}

impl ProgressEvent {
    /// Create a new progress event.
    pub fn new(processed: u64, total: u64) -> Self {
        Self { processed, total }
    }

    /// Get the progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.processed as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Check if every counted entry has been handled.
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}
