//! A filtered view over one tracked calendar.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::FilterConfig;
use crate::date_range::DateRange;
use crate::error::FilterCalResult;
use crate::event::{Event, EventTime, RawEvent};
use crate::filter::EventFilter;
use crate::merge::{MergedEvent, SummaryPolicy, merge, pass_through};
use crate::source::EventSource;

/// Display attributes of the current or next span, for templating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAttributes {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub ongoing: bool,
}

/// Holds a compiled filter and the spans published by the last successful
/// refresh. Building one validates the configuration, so a bad regex is
/// reported here and never during a refresh.
#[derive(Debug, Clone)]
pub struct FilterCalendar {
    config: FilterConfig,
    filter: EventFilter,
    policy: SummaryPolicy,
    events: Vec<MergedEvent>,
}

impl FilterCalendar {
    pub fn new(config: FilterConfig) -> FilterCalResult<Self> {
        config.check_fields()?;
        let filter = EventFilter::new(&config)?;
        let policy = config.merge.summary_policy()?;

        Ok(FilterCalendar {
            config,
            filter,
            policy,
            events: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Fetch everything from `source` and publish the processed spans.
    ///
    /// Spans are merged over the full fetch; use `events_in_range` to window
    /// them afterwards. On a fetch error nothing is processed, the previously published spans
    /// stay in place, and the error is handed back to the caller.
    pub fn refresh(&mut self, source: &dyn EventSource) -> FilterCalResult<&[MergedEvent]> {
        debug!(calendar = %self.name(), "Refreshing");

        let raw = match source.list_events(&self.config.tracking_calendar_id) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    calendar = %self.name(),
                    tracking = %self.config.tracking_calendar_id,
                    error = %e,
                    "Fetch failed, keeping previous events"
                );
                return Err(e);
            }
        };

        self.events = self.process(raw);
        debug!(calendar = %self.name(), count = self.events.len(), "Published spans");
        Ok(&self.events)
    }

    /// Validate, filter and merge one batch of raw events.
    pub fn process(&self, raw: Vec<RawEvent>) -> Vec<MergedEvent> {
        let events = validate(raw);
        let selected = self.filter.apply(&events);

        if self.config.merge.enabled {
            merge(selected, &self.policy)
        } else {
            pass_through(selected)
        }
    }

    /// Spans published by the last successful refresh, ascending by start.
    pub fn events(&self) -> &[MergedEvent] {
        &self.events
    }

    /// The span in progress at `now`, or else the next one to start.
    pub fn event(&self, now: DateTime<Utc>) -> Option<&MergedEvent> {
        self.events.iter().find(|e| e.end.to_utc() > now)
    }

    pub fn attributes(&self, now: DateTime<Utc>) -> Option<EventAttributes> {
        self.event(now).map(|e| EventAttributes {
            summary: e.summary.clone(),
            start: e.start.clone(),
            end: e.end.clone(),
            ongoing: e.is_ongoing(now),
        })
    }

    /// Published spans touching `range`, each with its full merged extent.
    pub fn events_in_range(&self, range: &DateRange) -> Vec<&MergedEvent> {
        self.events.iter().filter(|e| e.overlaps(range)).collect()
    }
}

impl fmt::Display for FilterCalendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.config.name)
    }
}

/// Convert raw events, skipping malformed ones with a warning.
fn validate(raw: Vec<RawEvent>) -> Vec<Event> {
    raw.into_iter()
        .filter_map(|r| match Event::try_from(r) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(error = %e, "Skipping malformed event");
                None
            }
        })
        .collect()
}
