//! Canonical column layout of the waitlist files.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::PatientRecord;

pub const COL_NAME: &str = "Nome";
pub const COL_MEMBERSHIP_ID: &str = "Nº Carteirinha";
pub const COL_FIRST_CONTACT: &str = "Data 1º Contato";
pub const COL_DAYS_WAITED: &str = "Dias de Espera";
pub const COL_SPECIALTY: &str = "Especialidade";
pub const COL_PHONE: &str = "Telefone";
pub const COL_PREFERRED_TIME: &str = "Horário Preferencial";
pub const COL_HAS_PREFERENCE: &str = "Preferência Profissional";
pub const COL_PREFERRED_PROFESSIONAL: &str = "Profissional Indicado";
pub const COL_REGISTERED_BY: &str = "Registrado Por";
pub const COL_REGISTERED_AT: &str = "Data Registro";
pub const COL_SLOT_GRANTED: &str = "Vaga Concedida";
pub const COL_ASSIGNED_PROFESSIONAL: &str = "Profissional Responsável";
pub const COL_ASSIGNED_TIME: &str = "Horário Atendimento";
pub const COL_START_DATE: &str = "Data de Início";

/// Column order of every waitlist table and spreadsheet sheet.
pub const COLUMNS: [&str; 15] = [
    COL_NAME,
    COL_MEMBERSHIP_ID,
    COL_FIRST_CONTACT,
    COL_DAYS_WAITED,
    COL_SPECIALTY,
    COL_PHONE,
    COL_PREFERRED_TIME,
    COL_HAS_PREFERENCE,
    COL_PREFERRED_PROFESSIONAL,
    COL_REGISTERED_BY,
    COL_REGISTERED_AT,
    COL_SLOT_GRANTED,
    COL_ASSIGNED_PROFESSIONAL,
    COL_ASSIGNED_TIME,
    COL_START_DATE,
];

/// Position of `Dias de Espera` in [`COLUMNS`].
pub const DAYS_WAITED_INDEX: usize = 3;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

pub const YES: &str = "Sim";
pub const NO: &str = "Não";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_flag(flag: bool) -> &'static str {
    if flag {
        YES
    } else {
        NO
    }
}

/// Parse a date cell.
///
/// Older exports wrote full timestamps (`2024-05-01 00:00:00`), so only the
/// leading `YYYY-MM-DD` is read.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let prefix = value.get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

/// Parse a `Sim`/`Não` cell. Blank counts as `Não`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        YES => Some(true),
        NO | "" => Some(false),
        _ => None,
    }
}

/// Cells of one record in [`COLUMNS`] order, with days waited as of `as_of`.
pub fn record_cells(record: &PatientRecord, as_of: NaiveDate) -> [String; 15] {
    let grant = record.grant();
    [
        record.name.clone(),
        record.membership_id.clone(),
        format_date(record.first_contact_date()),
        record.days_waited(as_of).to_string(),
        record.specialty.label().to_string(),
        record.phone.clone(),
        record.preferred_time_slot.label().to_string(),
        format_flag(record.has_professional_preference()).to_string(),
        record.professional_preference.clone().unwrap_or_default(),
        record.registered_by.clone(),
        format_timestamp(record.registered_at),
        format_flag(record.slot_granted()).to_string(),
        grant
            .map(|g| g.assigned_professional.clone())
            .unwrap_or_default(),
        grant.map(|g| g.assigned_time_slot.clone()).unwrap_or_default(),
        grant
            .map(|g| format_date(g.treatment_start_date))
            .unwrap_or_default(),
    ]
}
