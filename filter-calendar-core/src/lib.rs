//! Core of filter-calendar.
//!
//! Selects events from a tracked calendar by keyword and category rules and
//! merges overlapping or back-to-back selections into consolidated spans:
//! - `filter` decides which events are kept
//! - `merge` unions the kept events into `MergedEvent`s
//! - `calendar` runs one refresh cycle against an `EventSource`

pub mod calendar;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod filter;
pub mod ics;
pub mod merge;
pub mod source;

pub use calendar::{EventAttributes, FilterCalendar};
pub use error::{EventError, FilterCalError, FilterCalResult};
pub use event::{Event, EventTime, RawEvent};
