//! Exporters for printdir listings.
//!
//! Each exporter takes the requested field list, which fixes the column
//! order, and the collected records, and writes exactly one artifact to a
//! caller-supplied writer. Inputs are never modified.
//!
//! | Format | Columns | Notes |
//! |---|---|---|
//! | CSV | field list | header row, CRLF line ends |
//! | HTML | field list | single table, cells escaped unless raw mode is chosen |
//! | JSON | per record | array of objects, 4-space indent, keys as inserted |

mod csv_table;
mod error;
mod format;
mod html;
mod json;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use printdir_core::{EntryRecord, MetadataField};
use tracing::debug;

pub use csv_table::write_csv;
pub use error::ExportError;
pub use format::ExportFormat;
pub use html::{HtmlOptions, write_html};
pub use json::write_json;

/// Options shared by all exporters.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Options for the HTML exporter.
    pub html: HtmlOptions,
}

/// Write `records` in the given format.
pub fn export<W: Write>(
    writer: W,
    format: ExportFormat,
    fields: &[MetadataField],
    records: &[EntryRecord],
    options: &ExportOptions,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(writer, fields, records),
        ExportFormat::Html => write_html(writer, fields, records, &options.html),
        ExportFormat::Json => write_json(writer, records),
    }
}

/// Create (or truncate) `path` and write `records` to it.
///
/// The file is written in place; if writing fails part way, a partial file
/// is left behind.
pub fn export_to_path(
    path: &Path,
    format: ExportFormat,
    fields: &[MetadataField],
    records: &[EntryRecord],
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::create(path, e))?;
    let mut writer = BufWriter::new(file);
    export(&mut writer, format, fields, records, options)?;
    writer.flush()?;
    debug!(path = %path.display(), %format, records = records.len(), "listing written");
    Ok(())
}
