use anyhow::{Context, Result};
use chrono::Utc;
use filter_calendar_core::config::FilterConfig;
use filter_calendar_core::source::EventSource;
use owo_colors::OwoColorize;
use serde_json::json;

use crate::commands::refresh_all;
use crate::render::{format_date_label, format_relative, format_time};

pub fn run(configs: Vec<FilterConfig>, source: &dyn EventSource, json: bool) -> Result<()> {
    let now = Utc::now();
    let calendars = refresh_all(configs, source)?;

    if json {
        let output: Vec<_> = calendars
            .iter()
            .map(|cal| {
                json!({
                    "name": cal.name(),
                    "event": cal.attributes(now),
                })
            })
            .collect();
        let text = serde_json::to_string_pretty(&output).context("Failed to serialize event")?;
        println!("{}", text);
        return Ok(());
    }

    for cal in &calendars {
        match cal.event(now) {
            Some(event) => println!(
                "{}: {} {} {} {}",
                cal.name().bold(),
                event.summary,
                format_date_label(&event.start).dimmed(),
                format_time(&event.start).trim().dimmed(),
                format!("({})", format_relative(event, now)).dimmed()
            ),
            None => println!("{}: {}", cal.name().bold(), "nothing upcoming".dimmed()),
        }
    }

    Ok(())
}
