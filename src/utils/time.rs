//! Time utilities

use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, Timelike, Utc};

/// First day of the month and first day of the following month, as the
/// half-open aggregation window [start, end)
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

/// Number of days in the given calendar month
pub fn days_in_month(year: i32, month: u32) -> Option<i64> {
    let (start, end) = month_bounds(year, month)?;
    Some(end.signed_duration_since(start).num_days())
}

/// Current UTC year and month
pub fn current_year_month() -> (i32, u32) {
    let now = Utc::now();
    (now.year(), now.month())
}

/// Time remaining until the next local midnight.
///
/// Used as the heatmap cache TTL so cached months roll over with the day;
/// clamped to at least a minute so a boundary read never caches forever.
pub fn until_next_midnight() -> Duration {
    let secs_today = Local::now().num_seconds_from_midnight() as u64;
    Duration::from_secs((86_400 - secs_today.min(86_400)).max(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), Some(31));
        assert_eq!(days_in_month(2025, 4), Some(30));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29)); // leap year
        assert_eq!(days_in_month(2025, 12), Some(31));
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(days_in_month(2025, 0), None);
        assert_eq!(days_in_month(2025, 13), None);
    }

    #[test]
    fn test_month_bounds_cover_month() {
        let (start, end) = month_bounds(2025, 6).unwrap();
        assert_eq!(start.to_string(), "2025-06-01");
        assert_eq!(end.to_string(), "2025-07-01");
    }

    #[test]
    fn test_until_next_midnight_in_range() {
        let ttl = until_next_midnight();
        assert!(ttl.as_secs() >= 60);
        assert!(ttl.as_secs() <= 86_400);
    }
}
