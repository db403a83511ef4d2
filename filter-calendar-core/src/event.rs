//! Provider-neutral event types.
//!
//! Sources hand back [`RawEvent`]s shaped like whatever the upstream calendar
//! produced. They are validated into [`Event`]s before filtering, so the rest
//! of the pipeline can rely on both timestamps being present and ordered.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EventError;

/// Start or end of an event.
///
/// All-day events carry a bare date, which compares as midnight UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl EventTime {
    /// The absolute instant used for ordering and overlap checks.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<DateTime<Utc>> for EventTime {
    fn from(dt: DateTime<Utc>) -> Self {
        EventTime::DateTime(dt)
    }
}

impl From<NaiveDate> for EventTime {
    fn from(d: NaiveDate) -> Self {
        EventTime::Date(d)
    }
}

/// A validated calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Event types as reported by the upstream calendar (e.g. a work shift kind)
    pub categories: Vec<String>,
    pub start: EventTime,
    pub end: EventTime,
}

impl Event {
    /// Create a timed event with no description, location or category.
    pub fn new(
        uid: impl Into<String>,
        summary: impl Into<String>,
        start: impl Into<EventTime>,
        end: impl Into<EventTime>,
    ) -> Self {
        Event {
            uid: uid.into(),
            summary: summary.into(),
            description: None,
            location: None,
            categories: Vec::new(),
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}

/// An event as delivered by a source, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(
        default,
        alias = "category",
        alias = "type",
        alias = "work_type",
        deserialize_with = "one_or_many"
    )]
    pub categories: Vec<String>,
    #[serde(default)]
    pub start: Option<EventTime>,
    #[serde(default)]
    pub end: Option<EventTime>,
}

impl TryFrom<RawEvent> for Event {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let summary = raw.summary.unwrap_or_else(|| "(No title)".to_string());
        let label = raw.uid.clone().unwrap_or_else(|| summary.clone());

        let start = raw.start.ok_or_else(|| EventError::MissingStart(label.clone()))?;
        let end = raw.end.ok_or_else(|| EventError::MissingEnd(label.clone()))?;

        if end.to_utc() < start.to_utc() {
            return Err(EventError::EndBeforeStart(label));
        }

        let uid = raw
            .uid
            .unwrap_or_else(|| format!("{}@{}", start.to_utc().timestamp(), summary));

        Ok(Event {
            uid,
            summary,
            description: raw.description,
            location: raw.location,
            categories: raw.categories,
            start,
            end,
        })
    }
}

/// Accept either a single category string or a list of them.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
        None => Vec::new(),
    })
}
