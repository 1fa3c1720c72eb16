//! Core types for printdir.
//!
//! This crate provides the data model shared by the scanner and the
//! exporters: scan requests, the closed set of metadata fields, entry
//! records and progress events.

mod error;
mod field;
mod record;
mod request;

pub use error::{ExtractError, RequestError, ScanError};
pub use field::{FieldValue, MetadataField, NOT_APPLICABLE};
pub use record::{EntryRecord, ProgressEvent, ScanResult};
pub use request::{
    DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, MIN_DEPTH_LIMIT, ScanRequest, ScanRequestBuilder,
};
