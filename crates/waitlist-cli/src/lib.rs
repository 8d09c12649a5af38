//! Waitlist CLI support library.

pub mod logging;
