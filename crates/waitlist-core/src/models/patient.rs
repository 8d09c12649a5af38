//! Patient waitlist records.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::catalog::{Specialty, TimeSlot};

/// Identity of a record inside a loaded store.
///
/// Assigned when the record enters the store and never persisted, so ids
/// are only stable for the lifetime of one `Waitlist` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(uuid::Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Treatment slot assigned when a patient leaves the waitlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotGrant {
    /// Professional who will treat the patient
    pub assigned_professional: String,
    /// Agreed session time (free text, e.g. "Seg/Qua 08:00")
    pub assigned_time_slot: String,
    /// First treatment session
    pub treatment_start_date: NaiveDate,
}

impl SlotGrant {
    pub fn new(
        assigned_professional: impl Into<String>,
        assigned_time_slot: impl Into<String>,
        treatment_start_date: NaiveDate,
    ) -> Self {
        Self {
            assigned_professional: assigned_professional.into(),
            assigned_time_slot: assigned_time_slot.into(),
            treatment_start_date,
        }
    }

    /// Name of the first blank required field, if any.
    pub(crate) fn missing_field(&self) -> Option<&'static str> {
        if self.assigned_professional.trim().is_empty() {
            Some("assigned_professional")
        } else if self.assigned_time_slot.trim().is_empty() {
            Some("assigned_time_slot")
        } else {
            None
        }
    }
}

/// Form input for a new waitlist entry, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Intake {
    pub name: String,
    pub membership_id: String,
    pub phone: String,
    pub first_contact_date: Option<NaiveDate>,
    pub specialty: Specialty,
    pub preferred_time_slot: TimeSlot,
    /// Preferred professional; `Some` only when the patient asked for one
    pub professional_preference: Option<String>,
}

impl Intake {
    /// Create an intake with the required fields; the rest start blank.
    pub fn new(
        name: impl Into<String>,
        first_contact_date: NaiveDate,
        specialty: Specialty,
    ) -> Self {
        Self {
            name: name.into(),
            membership_id: String::new(),
            phone: String::new(),
            first_contact_date: Some(first_contact_date),
            specialty,
            preferred_time_slot: TimeSlot::default(),
            professional_preference: None,
        }
    }

    /// Validate required fields and stamp the audit trail.
    pub(crate) fn into_record(
        self,
        registered_by: &str,
        registered_at: NaiveDateTime,
    ) -> Result<PatientRecord, &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        let first_contact_date = self
            .first_contact_date
            .ok_or("first contact date is required")?;

        Ok(PatientRecord {
            name: self.name.trim().to_string(),
            membership_id: self.membership_id,
            phone: self.phone,
            first_contact_date,
            specialty: self.specialty,
            preferred_time_slot: self.preferred_time_slot,
            professional_preference: self
                .professional_preference
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            registered_by: registered_by.to_string(),
            registered_at: truncate_to_minute(registered_at),
            grant: None,
        })
    }
}

/// One row of the waitlist.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub name: String,
    /// Health plan membership card number
    pub membership_id: String,
    pub phone: String,
    first_contact_date: NaiveDate,
    pub specialty: Specialty,
    pub preferred_time_slot: TimeSlot,
    pub professional_preference: Option<String>,
    /// User who last stamped this record (intake or slot grant)
    pub registered_by: String,
    pub registered_at: NaiveDateTime,
    grant: Option<SlotGrant>,
}

impl PatientRecord {
    /// Rebuild a record from persisted fields.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: String,
        membership_id: String,
        phone: String,
        first_contact_date: NaiveDate,
        specialty: Specialty,
        preferred_time_slot: TimeSlot,
        professional_preference: Option<String>,
        registered_by: String,
        registered_at: NaiveDateTime,
        grant: Option<SlotGrant>,
    ) -> Self {
        Self {
            name,
            membership_id,
            phone,
            first_contact_date,
            specialty,
            preferred_time_slot,
            professional_preference,
            registered_by,
            registered_at,
            grant,
        }
    }

    /// Date of the patient's first contact with the clinic.
    pub fn first_contact_date(&self) -> NaiveDate {
        self.first_contact_date
    }

    /// Whether the patient asked for a specific professional.
    pub fn has_professional_preference(&self) -> bool {
        self.professional_preference.is_some()
    }

    /// Granted treatment slot, if the patient has been served.
    pub fn grant(&self) -> Option<&SlotGrant> {
        self.grant.as_ref()
    }

    pub fn slot_granted(&self) -> bool {
        self.grant.is_some()
    }

    /// Days since first contact as of `as_of`.
    pub fn days_waited(&self, as_of: NaiveDate) -> i64 {
        crate::calculator::days_waited(self.first_contact_date, as_of)
    }

    pub(crate) fn apply_grant(
        &mut self,
        grant: SlotGrant,
        granted_by: &str,
        granted_at: NaiveDateTime,
    ) {
        self.grant = Some(grant);
        self.registered_by = granted_by.to_string();
        self.registered_at = truncate_to_minute(granted_at);
    }
}

/// Audit stamps are stored at minute resolution.
fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|at| at.with_nanosecond(0))
        .unwrap_or(at)
}
