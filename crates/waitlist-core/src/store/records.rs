//! Record lifecycle: intake, slot grant, and read views.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::{Collection, Waitlist, WaitlistEntry};
use crate::calculator::urgency_tier;
use crate::models::{Intake, PatientRecord, RecordId, SlotGrant, Specialty, UrgencyTier};
use crate::{WaitlistError, WaitlistResult};

/// A record with its derived fields refreshed for display or export.
#[derive(Debug, Clone, Copy)]
pub struct WaitlistRow<'a> {
    pub id: RecordId,
    pub record: &'a PatientRecord,
    pub days_waited: i64,
    pub tier: UrgencyTier,
}

/// One line of the registration history.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryEntry {
    pub name: String,
    pub specialty: Specialty,
    pub registered_by: String,
    pub registered_at: NaiveDateTime,
    pub slot_granted: bool,
}

impl Waitlist {
    /// Append a new patient to the waiting collection.
    pub fn add_to_waiting(
        &mut self,
        intake: Intake,
        registered_by: &str,
        registered_at: NaiveDateTime,
    ) -> WaitlistResult<RecordId> {
        let record = intake
            .into_record(registered_by, registered_at)
            .map_err(|reason| WaitlistError::Validation(reason.to_string()))?;

        let entry = WaitlistEntry::new(record);
        let id = entry.id;
        self.waiting.push(entry);

        tracing::info!(record = %id, registered_by, "Added patient to waitlist");
        Ok(id)
    }

    /// Move a waiting patient to `served` with the given treatment slot.
    ///
    /// On any error both collections are left untouched.
    pub fn grant_slot(
        &mut self,
        id: RecordId,
        grant: SlotGrant,
        granted_by: &str,
        granted_at: NaiveDateTime,
    ) -> WaitlistResult<()> {
        let position = self
            .waiting
            .iter()
            .position(|e| e.id == id)
            .ok_or(WaitlistError::NotFound(id))?;

        if let Some(field) = grant.missing_field() {
            return Err(WaitlistError::Validation(format!("{field} is required")));
        }

        let mut entry = self.waiting.remove(position);
        entry.record.apply_grant(grant, granted_by, granted_at);
        self.served.push(entry);

        tracing::info!(record = %id, granted_by, "Granted treatment slot");
        Ok(())
    }

    /// Rows of one collection with days waited computed as of `as_of`.
    pub fn rows(&self, collection: Collection, as_of: NaiveDate) -> Vec<WaitlistRow<'_>> {
        self.entries(collection)
            .iter()
            .map(|entry| {
                let days_waited = entry.record.days_waited(as_of);
                WaitlistRow {
                    id: entry.id,
                    record: &entry.record,
                    days_waited,
                    tier: urgency_tier(days_waited),
                }
            })
            .collect()
    }

    /// Who registered what and when, waiting records first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.waiting
            .iter()
            .chain(self.served.iter())
            .map(|entry| HistoryEntry {
                name: entry.record.name.clone(),
                specialty: entry.record.specialty,
                registered_by: entry.record.registered_by.clone(),
                registered_at: entry.record.registered_at,
                slot_granted: entry.record.slot_granted(),
            })
            .collect()
    }
}
