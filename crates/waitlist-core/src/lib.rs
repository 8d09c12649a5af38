//! Waitlist Core Library
//!
//! Waitlist of a rehabilitation clinic: patients waiting for a treatment
//! slot, patients already served, and the wait-time rules used to
//! highlight who has waited longest.
//!
//! # Lifecycle
//!
//! ```text
//!   Intake form ──add_to_waiting──▶ [waiting] ──grant_slot──▶ [served]
//!                                       │                         │
//!                                       └────────────┬────────────┘
//!                                                    │
//!                          days waited + urgency tier recomputed on read
//!                                                    │
//!                            ┌───────────────────────┼──────────────┐
//!                            ▼                       ▼              ▼
//!                     data_espera.csv      data_atendidos.csv   .xlsx export
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, Specialty, UrgencyTier, etc.)
//! - [`calculator`]: Days waited and urgency tier
//! - [`store`]: The `waiting`/`served` collections and their transitions
//! - [`table`]: CSV codec with the canonical column set
//! - [`export`]: Two-sheet spreadsheet and CSV downloads
//! - [`users`]: Accounts, roles and permissions
//! - [`config`]: File locations

pub mod calculator;
pub mod config;
pub mod export;
pub mod models;
pub mod store;
pub mod table;
pub mod users;

// Re-export commonly used types
pub use calculator::{days_waited, days_waited_today, today, urgency_tier};
pub use config::WaitlistConfig;
pub use models::{Intake, PatientRecord, RecordId, SlotGrant, Specialty, TimeSlot, UrgencyTier};
pub use store::{Collection, Waitlist, WaitlistEntry, WaitlistRow};
pub use users::{Permission, Role, Session, UserDirectory};

use thiserror::Error;

/// Errors from store operations.
///
/// Exports, users and config keep their own error types.
#[derive(Error, Debug)]
pub enum WaitlistError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Record not in waiting list: {0}")]
    NotFound(RecordId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table error: {0}")]
    Table(#[from] table::TableError),

}

pub type WaitlistResult<T> = Result<T, WaitlistError>;
