use anyhow::Result;
use filter_calendar_core::FilterCalendar;
use filter_calendar_core::config::AppConfig;
use owo_colors::OwoColorize;

/// Build every configured calendar so pattern errors surface before a refresh.
pub fn run(cfg: &AppConfig) -> Result<()> {
    let mut failures = 0;

    for config in &cfg.calendars {
        match FilterCalendar::new(config.clone()) {
            Ok(calendar) => println!(
                "{} {} {}",
                "✓".green(),
                calendar,
                format!("(tracking {})", calendar.config().tracking_calendar_id).dimmed()
            ),
            Err(e) => {
                failures += 1;
                println!("{} {}: {}", "✗".red(), config.name, e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} calendar(s) have invalid configuration", failures);
    }

    if cfg.calendars.is_empty() {
        println!("{}", "No calendars configured".dimmed());
    }

    Ok(())
}
