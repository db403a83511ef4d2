//! ICS file parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use crate::event::{EventTime, RawEvent};

/// Parse ICS content into a RawEvent.
///
/// Returns None when the content isn't a calendar or holds no VEVENT. Missing
/// DTSTART/DTEND are left as None so validation can report them.
pub fn parse_event(content: &str) -> Option<RawEvent> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let uid = text_prop(vevent, "UID");
    let summary = text_prop(vevent, "SUMMARY");
    let description = text_prop(vevent, "DESCRIPTION");
    let location = text_prop(vevent, "LOCATION");

    // CATEGORIES may repeat and each may hold a comma-separated list
    let categories: Vec<String> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "CATEGORIES")
        .flat_map(|p| {
            p.val
                .as_ref()
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    let start = time_prop(vevent, "DTSTART");
    let end = time_prop(vevent, "DTEND").or_else(|| match &start {
        // An all-day event without DTEND lasts one day
        Some(EventTime::Date(d)) => d.succ_opt().map(EventTime::Date),
        _ => None,
    });

    Some(RawEvent {
        uid,
        summary,
        description,
        location,
        categories,
        start,
        end,
    })
}

fn text_prop(vevent: &Component, name: &str) -> Option<String> {
    vevent
        .find_prop(name)
        .map(|p| p.val.to_string())
        .filter(|s| !s.is_empty())
}

fn time_prop(vevent: &Component, name: &str) -> Option<EventTime> {
    let prop = vevent.find_prop(name)?;
    let dpt = DatePerhapsTime::try_from(prop).ok()?;
    to_event_time(dpt)
}

/// Convert icalendar's DatePerhapsTime to an absolute EventTime.
///
/// Floating times are read as UTC. Zoned times are resolved through the
/// IANA database; an unknown TZID is read as UTC.
fn to_event_time(dpt: DatePerhapsTime) -> Option<EventTime> {
    match dpt {
        DatePerhapsTime::Date(d) => Some(EventTime::Date(d)),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => Some(EventTime::DateTime(dt)),
            CalendarDateTime::Floating(naive) => Some(EventTime::DateTime(naive.and_utc())),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                zoned_to_utc(date_time, &tzid).map(EventTime::DateTime)
            }
        },
    }
}

fn zoned_to_utc(naive: NaiveDateTime, tzid: &str) -> Option<DateTime<Utc>> {
    match tzid.parse::<chrono_tz::Tz>() {
        Ok(tz) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        Err(_) => {
            tracing::debug!(tzid, "Unknown TZID, reading time as UTC");
            Some(naive.and_utc())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_timed_event_with_category() {
        let ics = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:TEST\r
BEGIN:VEVENT\r
UID:shift-1@roster\r
SUMMARY:Late shift\r
LOCATION:Ward 3\r
CATEGORIES:Work,Nights\r
DTSTART:20250320T130000Z\r
DTEND:20250320T210000Z\r
END:VEVENT\r
END:VCALENDAR\r
";

        let event = parse_event(ics).expect("Should parse VEVENT");

        assert_eq!(event.uid.as_deref(), Some("shift-1@roster"));
        assert_eq!(event.summary.as_deref(), Some("Late shift"));
        assert_eq!(event.location.as_deref(), Some("Ward 3"));
        assert_eq!(event.categories, vec!["Work", "Nights"]);
        assert_eq!(
            event.start,
            Some(EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 13, 0, 0).unwrap()))
        );
        assert_eq!(
            event.end,
            Some(EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 21, 0, 0).unwrap()))
        );
    }

    #[test]
    fn test_parse_repeated_categories() {
        let ics = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:TEST\r
BEGIN:VEVENT\r
UID:boxing-day\r
SUMMARY:Work\r
CATEGORIES:Work,Public Holiday\r
CATEGORIES:Overtime\r
DTSTART:20251226T090000Z\r
DTEND:20251226T170000Z\r
END:VEVENT\r
END:VCALENDAR\r
";

        let event = parse_event(ics).expect("Should parse VEVENT");

        assert_eq!(event.categories, vec!["Work", "Public Holiday", "Overtime"]);
    }

    #[test]
    fn test_parse_all_day_without_dtend_lasts_one_day() {
        let ics = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:TEST\r
BEGIN:VEVENT\r
UID:holiday\r
SUMMARY:Public Holiday\r
DTSTART;VALUE=DATE:20251225\r
END:VEVENT\r
END:VCALENDAR\r
";

        let event = parse_event(ics).expect("Should parse VEVENT");

        assert_eq!(
            event.start,
            Some(EventTime::Date(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()))
        );
        assert_eq!(
            event.end,
            Some(EventTime::Date(NaiveDate::from_ymd_opt(2025, 12, 26).unwrap()))
        );
    }

    #[test]
    fn test_parse_zoned_time_is_converted_to_utc() {
        let ics = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:TEST\r
BEGIN:VEVENT\r
UID:zoned\r
SUMMARY:Standup\r
DTSTART;TZID=Europe/Berlin:20250115T090000\r
DTEND;TZID=Europe/Berlin:20250115T091500\r
END:VEVENT\r
END:VCALENDAR\r
";

        let event = parse_event(ics).expect("Should parse VEVENT");

        assert_eq!(
            event.start,
            Some(EventTime::DateTime(Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap()))
        );
    }

    #[test]
    fn test_parse_missing_dtend_on_timed_event() {
        let ics = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:TEST\r
BEGIN:VEVENT\r
UID:open-ended\r
SUMMARY:Open ended\r
DTSTART:20250320T130000Z\r
END:VEVENT\r
END:VCALENDAR\r
";

        let event = parse_event(ics).expect("Should parse VEVENT");

        assert!(event.start.is_some());
        assert_eq!(event.end, None);
    }

    #[test]
    fn test_parse_without_vevent() {
        let ics = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:TEST\r
END:VCALENDAR\r
";

        assert!(parse_event(ics).is_none());
    }
}
