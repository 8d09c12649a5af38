//! Derived fields: days waited and urgency tier.
//!
//! Nothing here is ever persisted as ground truth. Callers pass the as-of
//! date explicitly so every read can refresh the derived values.

use chrono::NaiveDate;

use crate::models::UrgencyTier;

/// First day counted as medium urgency.
pub const MEDIUM_URGENCY_DAYS: i64 = 15;

/// First day counted as high urgency.
pub const HIGH_URGENCY_DAYS: i64 = 30;

/// Current local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Whole days between first contact and `as_of`.
///
/// Negative when the first contact lies after `as_of`.
pub fn days_waited(first_contact_date: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - first_contact_date).num_days()
}

/// Days waited as of the local date.
pub fn days_waited_today(first_contact_date: NaiveDate) -> i64 {
    days_waited(first_contact_date, today())
}

/// Map days waited to its urgency tier.
pub fn urgency_tier(days_waited: i64) -> UrgencyTier {
    if days_waited < MEDIUM_URGENCY_DAYS {
        UrgencyTier::Low
    } else if days_waited < HIGH_URGENCY_DAYS {
        UrgencyTier::Medium
    } else {
        UrgencyTier::High
    }
}
