//! Export of the waitlist for download: two-sheet workbook or single CSV.

mod workbook;

pub use workbook::*;

use std::io;

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::{Collection, Waitlist};
use crate::table::{self, TableError};

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Write one collection as CSV with days waited refreshed to `as_of`.
pub fn export_csv<W: io::Write>(
    writer: W,
    store: &Waitlist,
    collection: Collection,
    as_of: NaiveDate,
) -> ExportResult<()> {
    table::write_table(writer, store.records(collection), as_of)?;
    tracing::info!(collection = ?collection, "Exported CSV");
    Ok(())
}

/// CSV export as bytes.
pub fn csv_bytes(
    store: &Waitlist,
    collection: Collection,
    as_of: NaiveDate,
) -> ExportResult<Vec<u8>> {
    let mut buf = Vec::new();
    export_csv(&mut buf, store, collection, as_of)?;
    Ok(buf)
}
