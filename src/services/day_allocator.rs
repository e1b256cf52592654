//! Deterministic spread of attractions over trip days.
//!
//! Attractions are walked in input order. With `N` attractions over `D` days and
//! `per_day = ceil(N / D)`, the first `N mod D` days take `per_day` attractions and the
//! rest take `per_day - 1` (all days take `per_day` when `D` divides `N`). Every day
//! therefore exists, no attraction is dropped or repeated, and flattening the plan gives
//! back the input order. When `N < D` the trailing days are empty.

use std::collections::BTreeMap;

use crate::models::trip::{default_day_end, default_day_start};
use crate::models::{Attraction, ClockTime, DateRange, DayPlan, PlanSource, TripPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTiming {
    pub start: ClockTime,
    pub end: ClockTime,
    pub best: Option<ClockTime>,
}

impl Default for DayTiming {
    fn default() -> Self {
        Self {
            start: default_day_start(),
            end: default_day_end(),
            best: None,
        }
    }
}

impl DayTiming {
    /// Suggested times replace the defaults only when both ends are present and the day
    /// does not run backwards. A best time outside the resulting window is dropped.
    pub fn from_suggestion(
        start: Option<ClockTime>,
        end: Option<ClockTime>,
        best: Option<ClockTime>,
    ) -> Self {
        let mut timing = match (start, end) {
            (Some(start), Some(end)) if start < end => Self {
                start,
                end,
                best: None,
            },
            _ => Self::default(),
        };
        timing.best = best.filter(|best| *best >= timing.start && *best <= timing.end);
        timing
    }
}

pub fn per_day(total: usize, days: usize) -> usize {
    if days == 0 {
        return 0;
    }
    total.div_ceil(days)
}

/// Number of attractions each day receives, in day order.
pub fn day_sizes(total: usize, days: usize) -> Vec<usize> {
    if days == 0 {
        return Vec::new();
    }
    let base = total / days;
    let extra = total % days;
    (0..days).map(|day| base + usize::from(day < extra)).collect()
}

/// Spreads `attractions` over every day of `range`. Timings keyed by 1-based day index
/// override the default start and end for that day.
pub fn allocate(
    attractions: &[Attraction],
    range: &DateRange,
    timings: &BTreeMap<usize, DayTiming>,
) -> TripPlan {
    let mut remaining = attractions.iter();
    let days = day_sizes(attractions.len(), range.day_count())
        .into_iter()
        .zip(range.dates())
        .enumerate()
        .map(|(position, (size, date))| {
            let day = position + 1;
            let timing = timings.get(&day).copied().unwrap_or_default();
            DayPlan {
                day,
                date,
                attractions: remaining.by_ref().take(size).cloned().collect(),
                start_time: timing.start,
                end_time: timing.end,
                best_time: timing.best,
            }
        })
        .collect();

    TripPlan {
        days,
        source: PlanSource::Allocator,
    }
}

pub fn allocate_evenly(attractions: &[Attraction], range: &DateRange) -> TripPlan {
    allocate(attractions, range, &BTreeMap::new())
}
