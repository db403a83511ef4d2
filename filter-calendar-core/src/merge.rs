//! Coalescing of overlapping or back-to-back events into spans.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::event::{Event, EventTime};

/// How a span's summary is derived from the events it absorbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryPolicy {
    /// Distinct summaries in encounter order, joined by the separator
    Join(String),
    /// Summary of the earliest event
    First,
    /// Fixed label for every span
    Label(String),
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        SummaryPolicy::Join(" / ".to_string())
    }
}

impl SummaryPolicy {
    fn render(&self, summaries: &[String]) -> String {
        match self {
            SummaryPolicy::Join(separator) => summaries.join(separator),
            SummaryPolicy::First => summaries.first().cloned().unwrap_or_default(),
            SummaryPolicy::Label(label) => label.clone(),
        }
    }
}

/// A consolidated time span covering one or more selected events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedEvent {
    pub summary: String,
    /// Every distinct summary that went into this span, in encounter order
    pub summaries: Vec<String>,
    pub start: EventTime,
    pub end: EventTime,
}

impl MergedEvent {
    /// Whether `now` falls inside the span (start inclusive, end exclusive).
    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.start.to_utc() <= now && now < self.end.to_utc()
    }

    pub fn overlaps(&self, range: &DateRange) -> bool {
        range.overlaps(self.start.to_utc(), self.end.to_utc())
    }
}

impl fmt::Display for MergedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - {})", self.summary, self.start, self.end)
    }
}

impl From<MergedEvent> for Event {
    fn from(merged: MergedEvent) -> Self {
        let uid = format!("merged-{}", merged.start.to_utc().timestamp());
        Event::new(uid, merged.summary, merged.start, merged.end)
    }
}

/// Span under construction.
struct OpenSpan {
    start: EventTime,
    end: EventTime,
    summaries: Vec<String>,
}

impl OpenSpan {
    fn open(event: Event) -> Self {
        OpenSpan {
            start: event.start,
            end: event.end,
            summaries: vec![event.summary],
        }
    }

    /// Back-to-back events (zero gap) count as touching.
    fn touches(&self, event: &Event) -> bool {
        event.start.to_utc() <= self.end.to_utc()
    }

    fn extend(&mut self, event: Event) {
        if event.end.to_utc() > self.end.to_utc() {
            self.end = event.end;
        }
        if !self.summaries.contains(&event.summary) {
            self.summaries.push(event.summary);
        }
    }

    fn close(self, policy: &SummaryPolicy) -> MergedEvent {
        MergedEvent {
            summary: policy.render(&self.summaries),
            summaries: self.summaries,
            start: self.start,
            end: self.end,
        }
    }
}

/// Sort stably by (start, end) so events with equal starts keep input order.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.start
            .to_utc()
            .cmp(&b.start.to_utc())
            .then_with(|| a.end.to_utc().cmp(&b.end.to_utc()))
    });
}

/// Union the events' intervals into non-overlapping spans, ascending by start.
pub fn merge(mut events: Vec<Event>, policy: &SummaryPolicy) -> Vec<MergedEvent> {
    sort_events(&mut events);

    let mut merged = Vec::new();
    let mut current: Option<OpenSpan> = None;

    for event in events {
        current = match current.take() {
            Some(mut span) if span.touches(&event) => {
                span.extend(event);
                Some(span)
            }
            Some(span) => {
                merged.push(span.close(policy));
                Some(OpenSpan::open(event))
            }
            None => Some(OpenSpan::open(event)),
        };
    }

    if let Some(span) = current {
        merged.push(span.close(policy));
    }

    merged
}

/// One span per event, for calendars with merging turned off.
pub fn pass_through(mut events: Vec<Event>) -> Vec<MergedEvent> {
    sort_events(&mut events);

    events
        .into_iter()
        .map(|event| MergedEvent {
            summary: event.summary.clone(),
            summaries: vec![event.summary],
            start: event.start,
            end: event.end,
        })
        .collect()
}
