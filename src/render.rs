//! Terminal rendering for merged events.

use chrono::{DateTime, Local, NaiveDate, Utc};
use filter_calendar_core::EventTime;
use filter_calendar_core::merge::MergedEvent;
use owo_colors::OwoColorize;

/// Extension trait for colored terminal output.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for MergedEvent {
    fn render(&self) -> String {
        let time = format!("{} - {}", format_time(&self.start), format_time(&self.end));
        let mut line = format!("  {} {}", time, self.summary);

        if self.summaries.len() > 1 {
            let count = format!("({} merged)", self.summaries.len());
            line = format!("{} {}", line, count.dimmed());
        }

        line
    }
}

fn local_date(time: &EventTime) -> NaiveDate {
    match time {
        EventTime::Date(d) => *d,
        EventTime::DateTime(dt) => dt.with_timezone(&Local).date_naive(),
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(time: &EventTime) -> String {
    let today = Local::now().date_naive();
    let date = local_date(time);

    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Format the time portion of an event (e.g. "15:00" or "all-day")
pub fn format_time(time: &EventTime) -> String {
    match time {
        EventTime::Date(_) => "all-day".to_string(),
        EventTime::DateTime(dt) => format!("{:>5}", dt.with_timezone(&Local).format("%H:%M")),
    }
}

/// "now until 21:00" or "in 2h 30m", relative to `now`.
pub fn format_relative(event: &MergedEvent, now: DateTime<Utc>) -> String {
    if event.is_ongoing(now) {
        let until = match &event.end {
            EventTime::Date(d) => d.format("%a %b %-d").to_string(),
            EventTime::DateTime(_) => format_time(&event.end).trim().to_string(),
        };
        return format!("now until {}", until);
    }

    let wait = (event.start.to_utc() - now).num_minutes().max(0) as u64;
    let duration = std::time::Duration::from_secs(wait * 60);
    if wait == 0 {
        "starting now".to_string()
    } else {
        format!("in {}", humantime::format_duration(duration))
    }
}
