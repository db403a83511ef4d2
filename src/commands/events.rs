use anyhow::{Context, Result};
use filter_calendar_core::config::FilterConfig;
use filter_calendar_core::date_range::DateRange;
use filter_calendar_core::merge::MergedEvent;
use filter_calendar_core::source::EventSource;
use owo_colors::OwoColorize;
use serde_json::json;

use crate::commands::refresh_all;
use crate::render::{Render, format_date_label};

pub fn run(
    configs: Vec<FilterConfig>,
    source: &dyn EventSource,
    range: DateRange,
    json: bool,
) -> Result<()> {
    let calendars = refresh_all(configs, source)?;

    if json {
        let output: Vec<_> = calendars
            .iter()
            .map(|cal| {
                json!({
                    "name": cal.name(),
                    "events": cal.events_in_range(&range),
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&output).context("Failed to serialize events")?;
        println!("{}", text);
        return Ok(());
    }

    for (i, cal) in calendars.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("📅 {}", cal.name().bold());
        print_events(&cal.events_in_range(&range));
    }

    Ok(())
}

/// Print spans grouped by the day they start on.
fn print_events(events: &[&MergedEvent]) {
    if events.is_empty() {
        println!("   {}", "No events found".dimmed());
        return;
    }

    let mut current_date: Option<String> = None;

    for event in events {
        let date_label = format_date_label(&event.start);

        if current_date.as_ref() != Some(&date_label) {
            println!(" {}", date_label.bold());
            current_date = Some(date_label);
        }

        println!(" {}", event.render());
    }
}
