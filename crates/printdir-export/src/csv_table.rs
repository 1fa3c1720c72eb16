//! CSV export.

use std::io::Write;

use printdir_core::{EntryRecord, MetadataField};

use crate::error::ExportError;

/// Write a header row of field names, then one row per record.
///
/// Fields missing from a record are written as empty cells.
pub fn write_csv<W: Write>(
    writer: W,
    fields: &[MetadataField],
    records: &[EntryRecord],
) -> Result<(), ExportError> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    csv.write_record(fields.iter().map(MetadataField::name))?;
    for record in records {
        csv.write_record(fields.iter().map(|field| record.cell(*field)))?;
    }
    csv.flush()?;
    Ok(())
}
