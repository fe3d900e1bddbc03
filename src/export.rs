//! CSV export of the full history
//!
//! Columns are `timestamp,command,full_command`. Commas inside the command
//! columns are escaped as `\,` rather than quoted; consumers of earlier
//! exports expect that form, so the output is not RFC 4180 CSV.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::event_store::{EventStore, EventStoreResult};
use crate::types::Record;
use crate::utils::atomic_write_with;

/// Header row of the export
pub const CSV_HEADER: &str = "timestamp,command,full_command";

/// Escape commas with a backslash
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(',') {
        Cow::Owned(field.replace(',', "\\,"))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write the header and one row per record, returning the row count
pub fn export_csv<I, W>(records: I, writer: &mut W) -> io::Result<usize>
where
    I: IntoIterator<Item = Record>,
    W: Write,
{
    writeln!(writer, "{CSV_HEADER}")?;

    let mut rows = 0;
    for record in records {
        writeln!(
            writer,
            "{},{},{}",
            record.timestamp,
            escape_field(&record.base_command),
            escape_field(&record.full_command)
        )?;
        rows += 1;
    }

    Ok(rows)
}

/// Export the whole store to `output`
///
/// The output file is written through a temporary file, so an interrupted
/// export never leaves a truncated CSV behind.
pub fn export(store: &EventStore, output: &Path) -> EventStoreResult<usize> {
    let records = store.scan()?;

    let mut rows = 0;
    atomic_write_with(output, |writer| {
        rows = export_csv(records, writer)?;
        Ok(())
    })?;

    info!(rows, output = %output.display(), "exported command history");
    Ok(rows)
}
