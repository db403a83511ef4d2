//! Time window used to bound listings.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Days ahead of now covered by the default window.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 30;

/// Window of time. None values mean unbounded in that direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Default for DateRange {
    /// Default range: start of today until DEFAULT_LOOKAHEAD_DAYS from now
    fn default() -> Self {
        Self::upcoming(Utc::now())
    }
}

impl DateRange {
    pub fn unbounded() -> Self {
        DateRange { from: None, to: None }
    }

    /// From the start of `now`'s day until DEFAULT_LOOKAHEAD_DAYS later.
    pub fn upcoming(now: DateTime<Utc>) -> Self {
        let start_of_day = now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc();
        DateRange {
            from: Some(start_of_day),
            to: Some(now + Duration::days(DEFAULT_LOOKAHEAD_DAYS)),
        }
    }

    /// Build a range from CLI-style arguments.
    /// - `from`: "start" for unbounded, or YYYY-MM-DD
    /// - `to`: "end" for unbounded, or YYYY-MM-DD
    ///
    /// A missing `from` falls back to the default window. A missing `to` ends
    /// DEFAULT_LOOKAHEAD_DAYS after `from`, or after now when `from` is absent.
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        let default = Self::default();

        let from_dt = match from {
            Some("start") => None,
            Some(s) => Some(parse_date_start(s)?),
            None => default.from,
        };

        let to_dt = match to {
            Some("end") => None,
            Some(s) => Some(parse_date_end(s)?),
            None => match (from, from_dt) {
                (Some(_), Some(f)) => Some(f + Duration::days(DEFAULT_LOOKAHEAD_DAYS)),
                _ => default.to,
            },
        };

        if let (Some(f), Some(t)) = (from_dt, to_dt)
            && f > t
        {
            return Err(format!(
                "Range start {} is after range end {}",
                f.format("%Y-%m-%d"),
                t.format("%Y-%m-%d")
            ));
        }

        Ok(DateRange {
            from: from_dt,
            to: to_dt,
        })
    }

    /// Whether an interval touches this window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let after_from = self.from.is_none_or(|from| end >= from);
        let before_to = self.to.is_none_or(|to| start <= to);
        after_from && before_to
    }
}

/// Parse YYYY-MM-DD as start of day in UTC
fn parse_date_start(s: &str) -> Result<DateTime<Utc>, String> {
    let date = parse_date(s)?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Parse YYYY-MM-DD as end of day in UTC
fn parse_date_end(s: &str) -> Result<DateTime<Utc>, String> {
    let date = parse_date(s)?;
    let next_day = date
        .succ_opt()
        .ok_or_else(|| format!("Date '{}' is out of range", s))?;
    Ok(next_day.and_time(chrono::NaiveTime::MIN).and_utc() - Duration::seconds(1))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_args_explicit_dates() {
        let range = DateRange::from_args(Some("2025-03-01"), Some("2025-03-31")).unwrap();

        assert_eq!(range.from, Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
        assert_eq!(range.to, Some(Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn test_from_args_far_future_start_without_end() {
        let range = DateRange::from_args(Some("2099-01-01"), None).unwrap();

        assert_eq!(range.from, Some(Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(
            range.to,
            Some(Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap() + Duration::days(DEFAULT_LOOKAHEAD_DAYS))
        );
    }

    #[test]
    fn test_from_args_unbounded() {
        let range = DateRange::from_args(Some("start"), Some("end")).unwrap();

        assert_eq!(range, DateRange::unbounded());
    }

    #[test]
    fn test_from_args_rejects_bad_dates() {
        assert!(DateRange::from_args(Some("March 1st"), None).is_err());
        assert!(DateRange::from_args(Some("2025-04-01"), Some("2025-03-01")).is_err());
    }

    #[test]
    fn test_overlaps() {
        let range = DateRange::from_args(Some("2025-03-10"), Some("2025-03-10")).unwrap();
        let day_before = Utc.with_ymd_and_hms(2025, 3, 9, 22, 0, 0).unwrap();
        let day_of = Utc.with_ymd_and_hms(2025, 3, 10, 2, 0, 0).unwrap();
        let day_after = Utc.with_ymd_and_hms(2025, 3, 11, 1, 0, 0).unwrap();

        assert!(range.overlaps(day_before, day_of));
        assert!(!range.overlaps(day_before, day_before));
        assert!(!range.overlaps(day_after, day_after));
        assert!(DateRange::unbounded().overlaps(day_before, day_after));
    }

    #[test]
    fn test_upcoming_starts_at_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0).unwrap();

        let range = DateRange::upcoming(now);

        assert_eq!(range.from, Some(Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap()));
        assert_eq!(range.to, Some(now + Duration::days(DEFAULT_LOOKAHEAD_DAYS)));
    }
}
