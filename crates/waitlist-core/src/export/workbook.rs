//! Two-sheet spreadsheet export.
//!
//! Sheet "Em Espera" holds the waiting collection and "Atendidos" the
//! served one, both with the canonical column set. The `Dias de Espera`
//! cell carries the urgency colour of its row.

use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use super::ExportResult;
use crate::models::UrgencyTier;
use crate::store::{Collection, Waitlist};
use crate::table::{record_cells, COLUMNS, DAYS_WAITED_INDEX};

/// Build the workbook in memory.
pub fn build_workbook(store: &Waitlist, as_of: NaiveDate) -> ExportResult<Workbook> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for collection in [Collection::Waiting, Collection::Served] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(collection.sheet_name())?;
        write_sheet(sheet, store, collection, as_of, &header)?;
    }

    Ok(workbook)
}

/// Save the workbook to `path`.
pub fn export_workbook(path: &Path, store: &Waitlist, as_of: NaiveDate) -> ExportResult<()> {
    let mut workbook = build_workbook(store, as_of)?;
    workbook.save(path)?;
    tracing::info!(path = %path.display(), "Exported workbook");
    Ok(())
}

/// Workbook as `.xlsx` bytes, for download responses.
pub fn workbook_bytes(store: &Waitlist, as_of: NaiveDate) -> ExportResult<Vec<u8>> {
    let mut workbook = build_workbook(store, as_of)?;
    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    sheet: &mut Worksheet,
    store: &Waitlist,
    collection: Collection,
    as_of: NaiveDate,
    header: &Format,
) -> ExportResult<()> {
    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    for (i, row) in store.rows(collection, as_of).iter().enumerate() {
        let excel_row = (i + 1) as u32;
        let cells = record_cells(row.record, as_of);

        for (col, value) in cells.iter().enumerate() {
            if col == DAYS_WAITED_INDEX {
                sheet.write_number_with_format(
                    excel_row,
                    col as u16,
                    row.days_waited as f64,
                    &tier_format(row.tier),
                )?;
            } else {
                sheet.write_string(excel_row, col as u16, value.as_str())?;
            }
        }
    }

    sheet.autofit();
    Ok(())
}

fn tier_format(tier: UrgencyTier) -> Format {
    Format::new().set_background_color(Color::RGB(tier.rgb()))
}
