//! Per-entry metadata extraction.

use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

#[cfg(unix)]
use std::os::unix::fs::{MetadataExt, PermissionsExt};

use chrono::{DateTime, Local, Timelike};

use printdir_core::{EntryRecord, ExtractError, FieldValue, MetadataField, NOT_APPLICABLE};

use crate::owner::OwnerResolver;

/// Marker for fields the current platform cannot provide.
const UNSUPPORTED: &str = "N/A (unsupported)";

/// What the current platform can report, resolved once per extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// Entries have an owning user that can be resolved to a name.
    pub ownership: bool,
}

impl PlatformCapabilities {
    /// Detect the capabilities of the running platform.
    pub fn detect() -> Self {
        Self {
            ownership: cfg!(unix),
        }
    }

    /// Whether a field can be read on this platform. Unsupported fields are
    /// still emitted, with a fixed marker value.
    pub fn supports(&self, field: MetadataField) -> bool {
        match field {
            MetadataField::Owner => self.ownership,
            _ => true,
        }
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// Builds entry records from a single `stat` per entry.
#[derive(Debug, Default)]
pub struct MetadataExtractor {
    capabilities: PlatformCapabilities,
    owners: OwnerResolver,
}

impl MetadataExtractor {
    /// Create an extractor for the running platform.
    pub fn new() -> Self {
        Self::with_capabilities(PlatformCapabilities::detect())
    }

    /// Create an extractor with explicit capabilities.
    pub fn with_capabilities(capabilities: PlatformCapabilities) -> Self {
        Self {
            capabilities,
            owners: OwnerResolver::new(),
        }
    }

    /// Extract the requested fields for one entry.
    ///
    /// Links are followed, so a broken link reports
    /// [`ExtractError::NotFound`] just like a vanished path. Fields are
    /// inserted in canonical order regardless of the order requested.
    pub fn extract(
        &self,
        path: &Path,
        fields: &[MetadataField],
        is_dir: bool,
    ) -> Result<EntryRecord, ExtractError> {
        let metadata = std::fs::metadata(path).map_err(|e| ExtractError::io(path, e))?;

        let mut record = EntryRecord::new();
        for field in MetadataField::all() {
            if !fields.contains(&field) {
                continue;
            }
            let value = if self.capabilities.supports(field) {
                self.field_value(field, path, &metadata, is_dir)
            } else {
                FieldValue::from(UNSUPPORTED)
            };
            record.insert(field, value);
        }
        Ok(record)
    }

    fn field_value(
        &self,
        field: MetadataField,
        path: &Path,
        metadata: &Metadata,
        is_dir: bool,
    ) -> FieldValue {
        match field {
            MetadataField::FileName => file_name(path).into(),
            MetadataField::Path => path.to_string_lossy().into_owned().into(),
            MetadataField::Size => {
                if is_dir {
                    FieldValue::empty()
                } else {
                    metadata.len().into()
                }
            }
            MetadataField::CreationTime => timestamp(creation_time(metadata)),
            MetadataField::ModificationTime => timestamp(metadata.modified().ok()),
            MetadataField::AccessTime => timestamp(metadata.accessed().ok()),
            MetadataField::Type => type_label(path, is_dir).into(),
            MetadataField::Owner => self.owner(metadata),
            MetadataField::Permissions => permissions(metadata, is_dir).into(),
        }
    }

    #[cfg(unix)]
    fn owner(&self, metadata: &Metadata) -> FieldValue {
        self.owners
            .resolve(metadata.uid())
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
            .into()
    }

    #[cfg(not(unix))]
    fn owner(&self, _metadata: &Metadata) -> FieldValue {
        FieldValue::from(UNSUPPORTED)
    }
}

/// Extract metadata with a fresh extractor for the running platform.
///
/// Prefer reusing a [`MetadataExtractor`] when extracting many entries, so
/// owner lookups are cached.
pub fn extract(
    path: &Path,
    fields: &[MetadataField],
    is_dir: bool,
) -> Result<EntryRecord, ExtractError> {
    MetadataExtractor::new().extract(path, fields, is_dir)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// "Directory", "<EXT> File" or "File".
fn type_label(path: &Path, is_dir: bool) -> String {
    if is_dir {
        return "Directory".to_string();
    }
    match path.extension().map(|e| e.to_string_lossy()) {
        Some(ext) if !ext.is_empty() => format!("{} File", ext.to_uppercase()),
        _ => "File".to_string(),
    }
}

/// Birth time where the platform records it, otherwise the closest stand-in.
fn creation_time(metadata: &Metadata) -> Option<SystemTime> {
    metadata
        .created()
        .ok()
        .or_else(|| status_change_time(metadata))
        .or_else(|| metadata.modified().ok())
}

#[cfg(unix)]
fn status_change_time(metadata: &Metadata) -> Option<SystemTime> {
    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).ok()?;
    SystemTime::UNIX_EPOCH.checked_add(std::time::Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn status_change_time(_metadata: &Metadata) -> Option<SystemTime> {
    None
}

fn timestamp(time: Option<SystemTime>) -> FieldValue {
    match time {
        Some(time) => format_timestamp(time).into(),
        None => NOT_APPLICABLE.into(),
    }
}

/// ISO-8601 local time; microseconds are only shown when non-zero.
fn format_timestamp(time: SystemTime) -> String {
    let local = DateTime::<Local>::from(time).naive_local();
    if local.nanosecond() / 1_000 == 0 {
        local.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        local.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

#[cfg(unix)]
fn permissions(metadata: &Metadata, _is_dir: bool) -> String {
    format!("0o{:o}", metadata.permissions().mode() & 0o777)
}

/// Synthesized from the read-only flag, the only permission the platform
/// exposes.
#[cfg(not(unix))]
fn permissions(metadata: &Metadata, is_dir: bool) -> String {
    let mut bits = if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    if is_dir {
        bits |= 0o111;
    }
    format!("0o{bits:o}")
}
