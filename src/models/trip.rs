use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::attraction::Attraction;
use crate::models::date_range::DateRange;

/// Wall-clock time rendered the way the frontend shows it, e.g. `9:00 AM`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(pub NaiveTime);

const CLOCK_INPUT_FORMATS: [&str; 4] = ["%I:%M %p", "%I:%M%p", "%H:%M", "%H:%M:%S"];

impl ClockTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(ClockTime)
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        CLOCK_INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(&normalized, format).ok())
            .or_else(|| {
                // chrono needs a minute field to build a time, so "9 AM" gets one.
                let (hour, meridiem) = normalized.split_once(' ')?;
                NaiveTime::parse_from_str(&format!("{}:00 {}", hour, meridiem), "%I:%M %p").ok()
            })
            .map(ClockTime)
            .ok_or_else(|| format!("unrecognised clock time '{}'", s.trim()))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%-I:%M %p"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn default_day_start() -> ClockTime {
    ClockTime::from_hm(9, 0).unwrap_or_default()
}

pub fn default_day_end() -> ClockTime {
    ClockTime::from_hm(17, 0).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based.
    pub day: usize,
    pub date: NaiveDate,
    /// Visiting order.
    pub attractions: Vec<Attraction>,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time: Option<ClockTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanSource {
    /// Grouping suggested by the generation backend passed every check.
    Backend,
    /// Grouping produced by the deterministic day allocator.
    #[default]
    Allocator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    #[serde(rename = "plan")]
    pub days: Vec<DayPlan>,
    #[serde(skip)]
    pub source: PlanSource,
}

impl TripPlan {
    /// Checks day count, contiguous indices, dates and exact attraction coverage.
    pub fn check_invariants(&self, range: &DateRange, input: &[Attraction]) -> Result<(), String> {
        if self.days.len() != range.day_count() {
            return Err(format!(
                "expected {} days, found {}",
                range.day_count(),
                self.days.len()
            ));
        }

        for (position, day) in self.days.iter().enumerate() {
            let expected = position + 1;
            if day.day != expected {
                return Err(format!("day index {} found where {} was expected", day.day, expected));
            }
            if Some(day.date) != range.date_for_day(expected) {
                return Err(format!("day {} is dated {}", expected, day.date));
            }
        }

        let mut remaining: HashMap<&str, usize> = HashMap::new();
        for attraction in input {
            *remaining.entry(attraction.id.as_str()).or_default() += 1;
        }
        for attraction in self.days.iter().flat_map(|day| day.attractions.iter()) {
            match remaining.get_mut(attraction.id.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                Some(_) => return Err(format!("attraction '{}' is scheduled twice", attraction.id)),
                None => return Err(format!("attraction '{}' was not requested", attraction.id)),
            }
        }
        if let Some((id, _)) = remaining.iter().find(|(_, count)| **count > 0) {
            return Err(format!("attraction '{}' is missing from the plan", id));
        }

        Ok(())
    }

    pub fn attraction_count(&self) -> usize {
        self.days.iter().map(|day| day.attractions.len()).sum()
    }
}
