//! JSON export.

use std::io::Write;

use printdir_core::EntryRecord;
use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

use crate::error::ExportError;

/// Write the records as a pretty-printed array of objects.
///
/// Each object carries its own keys in insertion order, so no field list is
/// needed. Non-ASCII text is written as-is.
pub fn write_json<W: Write>(mut writer: W, records: &[EntryRecord]) -> Result<(), ExportError> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut writer, formatter);
    records.serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}
