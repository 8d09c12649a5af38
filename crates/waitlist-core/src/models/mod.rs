//! Domain models for the clinic waitlist.

mod catalog;
mod patient;
mod urgency;

pub use catalog::*;
pub use patient::*;
pub use urgency::*;
