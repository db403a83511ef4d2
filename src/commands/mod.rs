pub mod check;
pub mod events;
pub mod next;

use anyhow::{Context, Result};
use filter_calendar_core::FilterCalendar;
use filter_calendar_core::config::FilterConfig;
use filter_calendar_core::source::EventSource;
use tracing::warn;

/// Build each calendar and run one refresh cycle against `source`.
pub fn refresh_all(
    configs: Vec<FilterConfig>,
    source: &dyn EventSource,
) -> Result<Vec<FilterCalendar>> {
    configs
        .into_iter()
        .map(|config| {
            let name = config.name.clone();
            let mut calendar = FilterCalendar::new(config)
                .with_context(|| format!("Invalid configuration for calendar '{}'", name))?;
            calendar
                .refresh(source)
                .inspect_err(|e| warn!(calendar = %name, error = %e, "Refresh failed"))
                .with_context(|| format!("Failed to refresh calendar '{}'", name))?;
            Ok(calendar)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use filter_calendar_core::error::{FilterCalError, FilterCalResult};
    use filter_calendar_core::event::RawEvent;

    struct UnreachableSource;

    impl EventSource for UnreachableSource {
        fn list_events(&self, calendar_id: &str) -> FilterCalResult<Vec<RawEvent>> {
            Err(FilterCalError::CalendarNotFound(calendar_id.to_string()))
        }
    }

    #[test]
    fn test_refresh_failure_names_calendar() {
        let configs = vec![FilterConfig::new("Work", "roster")];

        let err = refresh_all(configs, &UnreachableSource).unwrap_err();

        assert_eq!(err.to_string(), "Failed to refresh calendar 'Work'");
        assert!(format!("{:#}", err).contains("Calendar not found: roster"));
    }
}
