//! Waitlist store: the `waiting` and `served` collections.
//!
//! A record lives in exactly one collection. Moving from `waiting` to
//! `served` through [`Waitlist::grant_slot`] is the only transition.

mod records;
mod search;

pub use records::*;
pub use search::*;

use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDate;

use crate::models::{PatientRecord, RecordId};
use crate::table::{self, TableError};
use crate::{WaitlistError, WaitlistResult};

/// Which collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Waiting,
    Served,
}

impl Collection {
    /// Sheet name used in the spreadsheet export.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Collection::Waiting => "Em Espera",
            Collection::Served => "Atendidos",
        }
    }
}

/// A record together with its in-store identity.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitlistEntry {
    pub id: RecordId,
    pub record: PatientRecord,
}

impl WaitlistEntry {
    fn new(record: PatientRecord) -> Self {
        Self {
            id: RecordId::new(),
            record,
        }
    }
}

/// In-memory waitlist with flat-file persistence.
#[derive(Debug, Clone, Default)]
pub struct Waitlist {
    waiting: Vec<WaitlistEntry>,
    served: Vec<WaitlistEntry>,
}

impl Waitlist {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-parsed collections.
    ///
    /// Fails if a waiting record carries a slot grant or a served record
    /// lacks one.
    pub fn from_records(
        waiting: Vec<PatientRecord>,
        served: Vec<PatientRecord>,
    ) -> WaitlistResult<Self> {
        if let Some(pos) = waiting.iter().position(|r| r.slot_granted()) {
            return Err(WaitlistError::Validation(format!(
                "waiting row {} already has a granted slot",
                pos + 1
            )));
        }
        if let Some(pos) = served.iter().position(|r| !r.slot_granted()) {
            return Err(WaitlistError::Validation(format!(
                "served row {} has no granted slot",
                pos + 1
            )));
        }

        Ok(Self {
            waiting: waiting.into_iter().map(WaitlistEntry::new).collect(),
            served: served.into_iter().map(WaitlistEntry::new).collect(),
        })
    }

    /// Load both collections. Absent files load as empty collections.
    pub fn load(waiting_path: &Path, served_path: &Path) -> WaitlistResult<Self> {
        let waiting = table::read_table_file(waiting_path)?;
        let served = table::read_table_file(served_path)?;
        let store = Self::from_records(waiting, served)?;

        tracing::info!(
            waiting = store.waiting.len(),
            served = store.served.len(),
            "Loaded waitlist"
        );
        Ok(store)
    }

    /// Load both collections from readers.
    pub fn read_from<R1: io::Read, R2: io::Read>(waiting: R1, served: R2) -> WaitlistResult<Self> {
        let waiting = table::read_table(waiting)?;
        let served = table::read_table(served)?;
        Self::from_records(waiting, served)
    }

    /// Save both collections with the `Dias de Espera` snapshot taken at `as_of`.
    ///
    /// Both files are written in full before either replaces the old one.
    /// Creates missing parent directories.
    pub fn save(
        &self,
        waiting_path: &Path,
        served_path: &Path,
        as_of: NaiveDate,
    ) -> WaitlistResult<()> {
        for path in [waiting_path, served_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let waiting =
            table::stage_table_file(waiting_path, self.records(Collection::Waiting), as_of)?;
        let served =
            table::stage_table_file(served_path, self.records(Collection::Served), as_of)?;

        // Served goes first: a failure between the two commits can leave a
        // granted record in both files, never in neither.
        served.commit()?;
        waiting.commit()?;

        tracing::info!(
            waiting = self.waiting.len(),
            served = self.served.len(),
            path = %waiting_path.display(),
            "Saved waitlist"
        );
        Ok(())
    }

    /// Write both collections to writers.
    pub fn write_to<W1: io::Write, W2: io::Write>(
        &self,
        waiting: W1,
        served: W2,
        as_of: NaiveDate,
    ) -> Result<(), TableError> {
        table::write_table(waiting, self.records(Collection::Waiting), as_of)?;
        table::write_table(served, self.records(Collection::Served), as_of)
    }

    /// Patients still waiting, in insertion order.
    pub fn waiting(&self) -> &[WaitlistEntry] {
        &self.waiting
    }

    /// Patients with a granted slot, in grant order.
    pub fn served(&self) -> &[WaitlistEntry] {
        &self.served
    }

    pub fn entries(&self, collection: Collection) -> &[WaitlistEntry] {
        match collection {
            Collection::Waiting => &self.waiting,
            Collection::Served => &self.served,
        }
    }

    /// Iterate the records of one collection.
    pub fn records(&self, collection: Collection) -> impl Iterator<Item = &PatientRecord> {
        self.entries(collection).iter().map(|e| &e.record)
    }

    /// Find a record by id in either collection.
    pub fn get(&self, id: RecordId) -> Option<(Collection, &PatientRecord)> {
        self.waiting
            .iter()
            .find(|e| e.id == id)
            .map(|e| (Collection::Waiting, &e.record))
            .or_else(|| {
                self.served
                    .iter()
                    .find(|e| e.id == id)
                    .map(|e| (Collection::Served, &e.record))
            })
    }

    pub fn len(&self) -> usize {
        self.waiting.len() + self.served.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty() && self.served.is_empty()
    }
}
