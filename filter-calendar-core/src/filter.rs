//! Event selection by category and keyword.

use std::collections::HashSet;

use regex::Regex;

use crate::config::{FilterConfig, MatchField};
use crate::error::{FilterCalError, FilterCalResult};
use crate::event::Event;

/// How the keyword is compared against event text.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Unanchored regex search
    Regex(Regex),
    /// Case-insensitive substring; holds the lowercased keyword
    Substring(String),
}

impl Matcher {
    pub fn new(keyword: &str, use_regex: bool) -> FilterCalResult<Self> {
        if use_regex {
            let regex = Regex::new(keyword).map_err(|source| FilterCalError::InvalidRegex {
                pattern: keyword.to_string(),
                source,
            })?;
            Ok(Matcher::Regex(regex))
        } else {
            Ok(Matcher::Substring(keyword.to_lowercase()))
        }
    }

    /// True for an empty keyword, which selects every event.
    pub fn matches_everything(&self) -> bool {
        match self {
            Matcher::Regex(regex) => regex.as_str().is_empty(),
            Matcher::Substring(keyword) => keyword.is_empty(),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Regex(regex) => regex.is_match(text),
            Matcher::Substring(keyword) => text.to_lowercase().contains(keyword.as_str()),
        }
    }
}

/// Compiled selection rules for one filtered calendar.
///
/// Rules apply in order: any excluded category always drops the event, any
/// included category always keeps it, and anything else is kept only when
/// the keyword matches one of the configured text fields.
#[derive(Debug, Clone)]
pub struct EventFilter {
    matcher: Matcher,
    include: HashSet<String>,
    exclude: HashSet<String>,
    fields: Vec<MatchField>,
}

impl EventFilter {
    pub fn new(config: &FilterConfig) -> FilterCalResult<Self> {
        Ok(EventFilter {
            matcher: Matcher::new(&config.filter, config.regex)?,
            include: config.include_work_types.iter().cloned().collect(),
            exclude: config.exclude_types.iter().cloned().collect(),
            fields: config.match_fields.clone(),
        })
    }

    pub fn keep(&self, event: &Event) -> bool {
        if event.categories.iter().any(|c| self.exclude.contains(c)) {
            return false;
        }
        if event.categories.iter().any(|c| self.include.contains(c)) {
            return true;
        }

        if self.matcher.matches_everything() {
            return true;
        }

        self.fields
            .iter()
            .filter_map(|field| field_text(event, *field))
            .any(|text| self.matcher.is_match(text))
    }

    /// Selected events in their original order.
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events.iter().filter(|e| self.keep(e)).cloned().collect()
    }
}

fn field_text(event: &Event, field: MatchField) -> Option<&str> {
    match field {
        MatchField::Summary => Some(event.summary.as_str()),
        MatchField::Description => event.description.as_deref(),
        MatchField::Location => event.location.as_deref(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(uid: &str, summary: &str, category: Option<&str>) -> Event {
        let e = Event::new(
            uid,
            summary,
            Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap(),
        );
        match category {
            Some(c) => e.with_category(c),
            None => e,
        }
    }

    fn config(keyword: &str, include: &[&str], exclude: &[&str]) -> FilterConfig {
        let mut config = FilterConfig::new("Test", "upstream");
        config.filter = keyword.to_string();
        config.include_work_types = include.iter().map(|s| s.to_string()).collect();
        config.exclude_types = exclude.iter().map(|s| s.to_string()).collect();
        config
    }

    #[test]
    fn test_exclude_wins_over_include_and_keyword() {
        let filter = EventFilter::new(&config("Work", &["Holiday"], &["Holiday"])).unwrap();

        assert!(!filter.keep(&event("a", "Work party", Some("Holiday"))));
    }

    #[test]
    fn test_any_excluded_category_drops_event() {
        let filter = EventFilter::new(&config("Work", &["Work"], &["Public Holiday"])).unwrap();

        let e = event("a", "Work", Some("Work")).with_category("Public Holiday");

        assert!(!filter.keep(&e));
    }

    #[test]
    fn test_any_included_category_keeps_event() {
        let filter = EventFilter::new(&config("Work", &["Lunch"], &[])).unwrap();

        let e = event("a", "Sandwiches", Some("Break")).with_category("Lunch");

        assert!(filter.keep(&e));
    }

    #[test]
    fn test_include_keeps_regardless_of_keyword() {
        let filter = EventFilter::new(&config("Work", &["Lunch"], &[])).unwrap();

        assert!(filter.keep(&event("a", "Sandwiches", Some("Lunch"))));
        assert!(!filter.keep(&event("b", "Sandwiches", Some("Break"))));
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let filter = EventFilter::new(&config("work", &[], &[])).unwrap();

        assert!(filter.keep(&event("a", "Night WORK shift", None)));
        assert!(!filter.keep(&event("b", "Gym", None)));
    }

    #[test]
    fn test_empty_keyword_matches_everything_not_excluded() {
        let filter = EventFilter::new(&config("", &[], &["Public Holiday"])).unwrap();

        assert!(filter.keep(&event("a", "Anything", None)));
        assert!(filter.keep(&event("b", "Anything", Some("Other"))));
        assert!(!filter.keep(&event("c", "Anything", Some("Public Holiday"))));
    }

    #[test]
    fn test_regex_is_unanchored_search() {
        let mut config = config("(Early|Late) shift", &[], &[]);
        config.regex = true;
        let filter = EventFilter::new(&config).unwrap();

        assert!(filter.keep(&event("a", "Roster: Late shift (ward 3)", None)));
        assert!(!filter.keep(&event("b", "Day off", None)));
    }

    #[test]
    fn test_invalid_regex_fails_at_construction() {
        let mut config = config("(unclosed", &[], &[]);
        config.regex = true;

        let result = EventFilter::new(&config);

        assert!(matches!(result, Err(FilterCalError::InvalidRegex { .. })));
    }

    #[test]
    fn test_regex_characters_are_literal_in_substring_mode() {
        let filter = EventFilter::new(&config("(on call)", &[], &[])).unwrap();

        assert!(filter.keep(&event("a", "Weekend (On Call)", None)));
    }

    #[test]
    fn test_match_fields_extend_keyword_search() {
        let mut config = config("hospital", &[], &[]);
        let summary_only = EventFilter::new(&config).unwrap();
        config.match_fields = vec![MatchField::Summary, MatchField::Location];
        let with_location = EventFilter::new(&config).unwrap();

        let e = event("a", "Shift", None).with_location("City Hospital");

        assert!(!summary_only.keep(&e));
        assert!(with_location.keep(&e));
    }

    #[test]
    fn test_apply_preserves_order() {
        let filter = EventFilter::new(&config("Work", &["Lunch"], &["Public Holiday"])).unwrap();
        let events = vec![
            event("a", "Lunch", Some("Lunch")),
            event("b", "Work", None),
            event("c", "Gym", None),
            event("d", "Public Holiday", Some("Public Holiday")),
            event("e", "More work", None),
        ];

        let uids: Vec<_> = filter.apply(&events).into_iter().map(|e| e.uid).collect();

        assert_eq!(uids, vec!["a", "b", "e"]);
    }

    #[test]
    fn test_apply_empty() {
        let filter = EventFilter::new(&config("Work", &[], &[])).unwrap();

        assert!(filter.apply(&[]).is_empty());
    }
}
