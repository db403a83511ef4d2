//! Upstream calendars that raw events are fetched from.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{FilterCalError, FilterCalResult};
use crate::event::RawEvent;
use crate::ics::parse_event;

/// Anything that can list raw events for a tracked calendar.
///
/// Sources return every event they hold. Windowing happens after merging, so
/// a span crossing the window edge keeps its full extent.
pub trait EventSource {
    fn list_events(&self, calendar_id: &str) -> FilterCalResult<Vec<RawEvent>>;
}

/// Calendars stored as directories of `.ics` files, one event per file:
/// `<root>/<calendar_id>/*.ics`.
#[derive(Debug, Clone)]
pub struct LocalCalendarSource {
    root: PathBuf,
}

impl LocalCalendarSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalCalendarSource { root: root.into() }
    }

    pub fn calendar_path(&self, calendar_id: &str) -> PathBuf {
        self.root.join(calendar_id)
    }
}

impl EventSource for LocalCalendarSource {
    fn list_events(&self, calendar_id: &str) -> FilterCalResult<Vec<RawEvent>> {
        let dir = self.calendar_path(calendar_id);
        if !dir.is_dir() {
            return Err(FilterCalError::CalendarNotFound(format!(
                "{} (looked in {})",
                calendar_id,
                dir.display()
            )));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "ics"))
            .collect();
        paths.sort();

        let events: Vec<RawEvent> = paths
            .iter()
            .filter_map(|path| read_ics_file(path))
            .collect();

        debug!(calendar_id, count = events.len(), "Read events from local calendar");
        Ok(events)
    }
}

fn read_ics_file(path: &Path) -> Option<RawEvent> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable event file");
            return None;
        }
    };

    let event = parse_event(&content);
    if event.is_none() {
        warn!(path = %path.display(), "Skipping file without a parseable VEVENT");
    }
    event
}

/// A JSON file holding an array of raw events, for hosts that export their
/// upstream calendar as JSON. The calendar id is not consulted.
///
/// Array elements that don't decode as an event are skipped with a warning.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }
}

impl EventSource for JsonFileSource {
    fn list_events(&self, _calendar_id: &str) -> FilterCalResult<Vec<RawEvent>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            FilterCalError::Source(format!("Could not read {}: {}", self.path.display(), e))
        })?;

        let entries: Vec<serde_json::Value> = serde_json::from_str(&content)
            .map_err(|e| FilterCalError::Serialization(e.to_string()))?;

        let events = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<RawEvent>(entry) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(path = %self.path.display(), index, error = %e, "Skipping undecodable event");
                    None
                }
            })
            .collect();

        Ok(events)
    }
}
