use std::io::Write;

use rides_core::{DayTable, RIDE_COLUMNS};

use crate::error::ExportError;

/// Header first, then one row per ride. Timestamps serialize as RFC 3339 and
/// an absent promo code as an empty field.
pub(crate) fn write_csv<W: Write>(table: &DayTable, sink: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(sink);

    wtr.write_record(RIDE_COLUMNS)?;
    for record in &table.records {
        wtr.serialize(record)?;
    }

    wtr.flush().map_err(|source| ExportError::Io {
        path: "<csv stream>".into(),
        source,
    })?;
    Ok(())
}
