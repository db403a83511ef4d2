//! ICS file parsing.
//!
//! Tracked calendars store one VEVENT per `.ics` file (RFC 5545).

mod parse;

pub use parse::parse_event;
