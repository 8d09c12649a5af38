//! Flat-file codec for waitlist tables.
//!
//! One CSV file per collection, header row first. Columns are located by
//! header name, so files with a different column order still load, but
//! every canonical column must be present.

mod schema;

pub use schema::*;

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::models::{PatientRecord, SlotGrant, Specialty, TimeSlot};

/// Table read/write errors.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: csv::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },

    #[error("Failed to replace {path}: {source}")]
    Persist { path: PathBuf, source: io::Error },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),

    #[error("Row {row}: invalid value {value:?} in column {column}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

pub type TableResult<T> = Result<T, TableError>;

/// Header name → column index.
struct ColumnIndex(HashMap<&'static str, usize>);

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> TableResult<Self> {
        let mut positions = HashMap::new();
        for column in COLUMNS {
            let position = headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
                .ok_or(TableError::MissingColumn(column))?;
            positions.insert(column, position);
        }
        Ok(Self(positions))
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: &'static str) -> &'r str {
        self.0
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
    }
}

/// Read patient records from CSV.
///
/// `Dias de Espera` is ignored; it is recomputed by whoever reads the
/// records.
pub fn read_table<R: io::Read>(reader: R) -> TableResult<Vec<PatientRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let index = ColumnIndex::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(parse_row(&index, &row, i + 1)?);
    }
    Ok(records)
}

/// Read a table file. A missing file is an empty table.
pub fn read_table_file(path: &Path) -> TableResult<Vec<PatientRecord>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Table file absent, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    read_table(file).map_err(|e| match e {
        TableError::Csv(source) => TableError::Read {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Write the header and one row per record.
pub fn write_table<'a, W, I>(writer: W, records: I, as_of: NaiveDate) -> TableResult<()>
where
    W: io::Write,
    I: IntoIterator<Item = &'a PatientRecord>,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(record_cells(record, as_of))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a table file, replacing any previous content.
///
/// The old file stays intact until the new one is completely written.
pub fn write_table_file<'a, I>(path: &Path, records: I, as_of: NaiveDate) -> TableResult<()>
where
    I: IntoIterator<Item = &'a PatientRecord>,
{
    stage_table_file(path, records, as_of)?.commit()
}

/// A fully written table waiting to replace its target file.
#[derive(Debug)]
pub struct StagedTable {
    file: NamedTempFile,
    path: PathBuf,
}

impl StagedTable {
    /// Target file this table will replace.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically move the table over its target.
    pub fn commit(self) -> TableResult<()> {
        let path = self.path;
        self.file
            .persist(&path)
            .map_err(|e| TableError::Persist { path, source: e.error })?;
        Ok(())
    }
}

/// Write a table to a temporary file in the target's directory.
///
/// The target is untouched until [`StagedTable::commit`]. Dropping the
/// staged table removes the temporary file.
pub fn stage_table_file<'a, I>(
    path: &Path,
    records: I,
    as_of: NaiveDate,
) -> TableResult<StagedTable>
where
    I: IntoIterator<Item = &'a PatientRecord>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    write_table(file.as_file_mut(), records, as_of).map_err(|e| match e {
        TableError::Csv(source) => TableError::Write {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    file.as_file().sync_all()?;

    Ok(StagedTable {
        file,
        path: path.to_path_buf(),
    })
}

fn parse_row(
    index: &ColumnIndex,
    row: &StringRecord,
    row_number: usize,
) -> TableResult<PatientRecord> {
    let cell = |column: &'static str| index.cell(row, column);
    let invalid = |column: &'static str| TableError::InvalidValue {
        row: row_number,
        column,
        value: index.cell(row, column).to_string(),
    };

    let name = cell(COL_NAME).trim().to_string();
    if name.is_empty() {
        return Err(invalid(COL_NAME));
    }

    let first_contact_date =
        parse_date(cell(COL_FIRST_CONTACT)).ok_or_else(|| invalid(COL_FIRST_CONTACT))?;
    let specialty: Specialty = cell(COL_SPECIALTY).parse().map_err(|_| invalid(COL_SPECIALTY))?;
    let preferred_time_slot: TimeSlot = cell(COL_PREFERRED_TIME)
        .parse()
        .map_err(|_| invalid(COL_PREFERRED_TIME))?;

    let has_preference =
        parse_flag(cell(COL_HAS_PREFERENCE)).ok_or_else(|| invalid(COL_HAS_PREFERENCE))?;
    let professional_preference = Some(cell(COL_PREFERRED_PROFESSIONAL).trim())
        .filter(|name| has_preference && !name.is_empty())
        .map(str::to_string);

    let registered_at =
        parse_timestamp(cell(COL_REGISTERED_AT)).ok_or_else(|| invalid(COL_REGISTERED_AT))?;

    let slot_granted = parse_flag(cell(COL_SLOT_GRANTED)).ok_or_else(|| invalid(COL_SLOT_GRANTED))?;
    let grant = if slot_granted {
        let treatment_start_date =
            parse_date(cell(COL_START_DATE)).ok_or_else(|| invalid(COL_START_DATE))?;
        let grant = SlotGrant::new(
            cell(COL_ASSIGNED_PROFESSIONAL).trim(),
            cell(COL_ASSIGNED_TIME).trim(),
            treatment_start_date,
        );
        match grant.missing_field() {
            Some("assigned_professional") => return Err(invalid(COL_ASSIGNED_PROFESSIONAL)),
            Some(_) => return Err(invalid(COL_ASSIGNED_TIME)),
            None => Some(grant),
        }
    } else {
        None
    };

    Ok(PatientRecord::from_parts(
        name,
        cell(COL_MEMBERSHIP_ID).trim().to_string(),
        cell(COL_PHONE).trim().to_string(),
        first_contact_date,
        specialty,
        preferred_time_slot,
        professional_preference,
        cell(COL_REGISTERED_BY).trim().to_string(),
        registered_at,
        grant,
    ))
}
