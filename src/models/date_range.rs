use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ItineraryError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const RANGE_SEPARATOR: &str = " to ";

/// Longest trip that can be searched or planned, in days.
pub const MAX_TRIP_DAYS: usize = 30;

/// Inclusive trip dates. `start <= end` always holds and the range spans at most
/// [`MAX_TRIP_DAYS`] days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ItineraryError::invalid_input(format!(
                "Date range starts after it ends ({} to {})",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            )));
        }
        let days = (end - start).num_days() + 1;
        if days > MAX_TRIP_DAYS as i64 {
            return Err(ItineraryError::invalid_input(format!(
                "Trips can last at most {} days, got {}",
                MAX_TRIP_DAYS, days
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, never less than one.
    pub fn day_count(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Calendar date of a 1-based day index.
    pub fn date_for_day(&self, day: usize) -> Option<NaiveDate> {
        if day == 0 || day > self.day_count() {
            return None;
        }
        Some(self.start + Duration::days(day as i64 - 1))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.day_count()).filter_map(move |day| self.date_for_day(day))
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only its calendar date.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ItineraryError::invalid_input(format!("Invalid date '{}'", raw)))
}

impl FromStr for DateRange {
    type Err = ItineraryError;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s.split_once(RANGE_SEPARATOR).ok_or_else(|| {
            ItineraryError::invalid_input(format!(
                "Date range must look like '<start> to <end>', got '{}'",
                s.trim()
            ))
        })?;
        DateRange::new(parse_calendar_date(start)?, parse_calendar_date(end)?)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.start.format(DATE_FORMAT),
            RANGE_SEPARATOR,
            self.end.format(DATE_FORMAT)
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateRangeInput {
    Text(String),
    Structured { start: String, end: String },
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match DateRangeInput::deserialize(deserializer)? {
            DateRangeInput::Text(text) => text.parse(),
            DateRangeInput::Structured { start, end } => {
                parse_calendar_date(&start).and_then(|s| DateRange::new(s, parse_calendar_date(&end)?))
            }
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_count_is_inclusive() {
        let range = DateRange::new(date(2025, 4, 25), date(2025, 4, 27)).unwrap();
        assert_eq!(range.day_count(), 3);

        let single = DateRange::new(date(2025, 4, 25), date(2025, 4, 25)).unwrap();
        assert_eq!(single.day_count(), 1);

        let across_month = DateRange::new(date(2024, 2, 27), date(2024, 3, 2)).unwrap();
        assert_eq!(across_month.day_count(), 5);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let result = DateRange::new(date(2025, 4, 27), date(2025, 4, 25));
        assert!(matches!(result, Err(ItineraryError::InvalidInput(_))));
    }

    #[test]
    fn test_trip_length_is_capped() {
        let longest = DateRange::new(date(2025, 4, 1), date(2025, 4, 30)).unwrap();
        assert_eq!(longest.day_count(), MAX_TRIP_DAYS);

        let result = DateRange::new(date(2025, 4, 1), date(2025, 5, 1));
        assert!(matches!(result, Err(ItineraryError::InvalidInput(_))));

        let result = "0001-01-01 to 9999-12-31".parse::<DateRange>();
        assert!(matches!(result, Err(ItineraryError::InvalidInput(_))));
    }

    #[test]
    fn test_date_for_day() {
        let range: DateRange = "2025-04-25 to 2025-04-27".parse().unwrap();
        assert_eq!(range.date_for_day(1), Some(date(2025, 4, 25)));
        assert_eq!(range.date_for_day(3), Some(date(2025, 4, 27)));
        assert_eq!(range.date_for_day(0), None);
        assert_eq!(range.date_for_day(4), None);
        assert_eq!(range.dates().count(), 3);
    }

    #[test]
    fn test_parse_accepts_timestamps() {
        let range: DateRange = "2025-04-25T00:00:00.000Z to 2025-04-26T18:30:00+05:30"
            .parse()
            .unwrap();
        assert_eq!(range.start(), date(2025, 4, 25));
        assert_eq!(range.end(), date(2025, 4, 26));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("2025-04-25".parse::<DateRange>().is_err());
        assert!("tomorrow to next week".parse::<DateRange>().is_err());
        assert!("2025-04-27 to 2025-04-25".parse::<DateRange>().is_err());
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let text: DateRange = serde_json::from_value(json!("2025-04-25 to 2025-04-27")).unwrap();
        let structured: DateRange =
            serde_json::from_value(json!({"start": "2025-04-25", "end": "2025-04-27"})).unwrap();
        assert_eq!(text, structured);
        assert_eq!(serde_json::to_value(text).unwrap(), json!("2025-04-25 to 2025-04-27"));
    }
}
