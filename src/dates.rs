//! Day ranges for publication-date queries.
//!
//! Solr date math wants full timestamps, so each calendar day is rendered as
//! midnight UTC (`2009-10-19T00:00:00Z`) and combined with `/DAY` by callers.

use crate::error::{PlosError, Result};
use chrono::NaiveDate;

/// Input format for calendar days
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Solr timestamp format, pinned to midnight
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT00:00:00Z";

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_day(day: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(day.trim(), DAY_FORMAT)
        .map_err(|e| PlosError::InvalidDateRange(format!("'{}' is not a YYYY-MM-DD date: {}", day, e)))
}

/// Midnight UTC of `day` in Solr timestamp syntax.
pub fn solr_timestamp(day: NaiveDate) -> String {
    day.format(TIMESTAMP_FORMAT).to_string()
}

/// Every day in `[start, end)`, in order. Empty when `start >= end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day < end)
}

/// Timestamps for all days in `[start, end)`.
///
/// # Errors
///
/// Returns `InvalidDateRange` if either bound is not a `YYYY-MM-DD` date.
pub fn list_days(start: &str, end: &str) -> Result<Vec<String>> {
    let start = parse_day(start)?;
    let end = parse_day(end)?;
    Ok(days_between(start, end).map(solr_timestamp).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_days_covers_range() -> Result<()> {
        let days = list_days("2020-02-27", "2020-03-02")?;
        assert_eq!(
            days,
            vec![
                "2020-02-27T00:00:00Z",
                "2020-02-28T00:00:00Z",
                "2020-02-29T00:00:00Z",
                "2020-03-01T00:00:00Z",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_length_matches_day_difference() -> Result<()> {
        let start = parse_day("2019-12-15")?;
        let end = parse_day("2020-02-10")?;
        let days: Vec<NaiveDate> = days_between(start, end).collect();
        assert_eq!(days.len() as i64, (end - start).num_days());
        assert!(days.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap_or(w[0])));
        assert_eq!(days.first(), Some(&start));
        Ok(())
    }

    #[test]
    fn test_empty_ranges() -> Result<()> {
        assert!(list_days("2020-01-01", "2020-01-01")?.is_empty());
        assert!(list_days("2020-01-05", "2020-01-01")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_dates() {
        assert!(matches!(
            list_days("2020-13-01", "2020-01-01"),
            Err(PlosError::InvalidDateRange(_))
        ));
        assert!(matches!(
            list_days("2020-01-01", "yesterday"),
            Err(PlosError::InvalidDateRange(_))
        ));
    }
}
