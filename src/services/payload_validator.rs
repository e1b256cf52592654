//! Schema checks for extracted payloads.
//!
//! Attraction lists are validated field by field with small repairs (ratings clamped,
//! numeric ids stringified, optional text defaulted). Day plans never trust attraction
//! fields coming back from the backend: every reference is resolved against the list the
//! caller sent, by id first and then by name, ignoring case.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{ItineraryError, Result};
use crate::models::attraction::clamp_rating;
use crate::models::date_range::parse_calendar_date;
use crate::models::{Attraction, ClockTime, Coordinates};

/// One day as proposed by the backend, with attractions re-substituted from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedDay {
    pub day: usize,
    pub date: NaiveDate,
    pub attractions: Vec<Attraction>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub best_time: Option<ClockTime>,
}

pub fn parse_json(candidate: &str) -> Result<Value> {
    serde_json::from_str(candidate).map_err(|e| {
        log::debug!("Candidate payload failed to parse: {}", e);
        ItineraryError::from(e)
    })
}

pub fn validate_attractions(candidate: &str) -> Result<Vec<Attraction>> {
    let root = parse_json(candidate)?;
    let items = root
        .as_array()
        .ok_or_else(|| ItineraryError::schema("$", "expected an array of attractions"))?;

    let mut seen = HashSet::new();
    let mut attractions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = format!("[{}]", index);
        let attraction = attraction_from_value(item, &path)?;
        if !seen.insert(attraction.id.clone()) {
            return Err(ItineraryError::schema(
                format!("{}.id", path),
                format!("duplicate id '{}'", attraction.id),
            ));
        }
        attractions.push(attraction);
    }

    Ok(attractions)
}

pub fn attraction_from_value(value: &Value, path: &str) -> Result<Attraction> {
    let object = value
        .as_object()
        .ok_or_else(|| ItineraryError::schema(path, "expected an attraction object"))?;

    let id = id_field(object, path)?;
    let name = text_field(object, "name")
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ItineraryError::schema(format!("{}.name", path), "missing or empty"))?;

    let rating = match object.get("rating") {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|rating| rating.is_finite())
    .ok_or_else(|| ItineraryError::schema(format!("{}.rating", path), "expected a number"))?;

    let location = object
        .get("location")
        .and_then(Value::as_object)
        .ok_or_else(|| ItineraryError::schema(format!("{}.location", path), "expected an object"))?;

    Ok(Attraction {
        id,
        name,
        description: text_field(object, "description").unwrap_or_default(),
        category: text_field(object, "category").unwrap_or_default(),
        rating: clamp_rating(rating),
        visit_duration: text_field(object, "visitDuration").unwrap_or_default(),
        best_time: text_field(object, "bestTime").unwrap_or_default(),
        location: Coordinates {
            latitude: coordinate(location, "latitude", path)?,
            longitude: coordinate(location, "longitude", path)?,
        },
        image: text_field(object, "image").unwrap_or_default(),
    })
}

fn id_field(object: &Map<String, Value>, path: &str) -> Result<String> {
    let id = match object.get("id") {
        Some(Value::String(id)) => id.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    };
    if id.is_empty() {
        return Err(ItineraryError::schema(format!("{}.id", path), "missing or empty"));
    }
    Ok(id)
}

/// Strings are trimmed; numbers and booleans are rendered; anything else is absent.
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn coordinate(location: &Map<String, Value>, key: &str, path: &str) -> Result<f64> {
    location
        .get(key)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            ItineraryError::schema(format!("{}.location.{}", path, key), "expected a finite number")
        })
}

/// Lookup of the caller's attractions by id and by lower-cased name.
struct OriginalIndex<'a> {
    by_id: HashMap<&'a str, &'a Attraction>,
    by_name: HashMap<String, &'a Attraction>,
}

impl<'a> OriginalIndex<'a> {
    fn new(originals: &'a [Attraction]) -> Self {
        Self {
            by_id: originals.iter().map(|a| (a.id.as_str(), a)).collect(),
            by_name: originals
                .iter()
                .map(|a| (a.name.trim().to_lowercase(), a))
                .collect(),
        }
    }

    fn resolve(&self, reference: &Value, path: &str) -> Result<Attraction> {
        let found = match reference {
            Value::String(id) => self.by_id.get(id.trim()).copied(),
            Value::Number(number) => self.by_id.get(number.to_string().as_str()).copied(),
            Value::Object(object) => {
                let by_id = id_field(object, path)
                    .ok()
                    .and_then(|id| self.by_id.get(id.as_str()).copied());
                by_id.or_else(|| {
                    let name = text_field(object, "name")?.to_lowercase();
                    self.by_name.get(&name).copied()
                })
            }
            _ => {
                return Err(ItineraryError::schema(
                    path,
                    "expected an attraction object or id",
                ))
            }
        };

        found
            .cloned()
            .ok_or_else(|| ItineraryError::schema(path, "does not match any requested attraction"))
    }
}

pub fn validate_day_plans(candidate: &str, originals: &[Attraction]) -> Result<Vec<ProposedDay>> {
    let root = parse_json(candidate)?;
    let days = root
        .as_object()
        .ok_or_else(|| ItineraryError::schema("$", "expected an object"))?
        .get("plan")
        .and_then(Value::as_array)
        .ok_or_else(|| ItineraryError::schema("plan", "expected an array of days"))?;

    let index = OriginalIndex::new(originals);
    days.iter()
        .enumerate()
        .map(|(position, value)| proposed_day(value, &format!("plan[{}]", position), &index))
        .collect()
}

fn proposed_day(value: &Value, path: &str, index: &OriginalIndex<'_>) -> Result<ProposedDay> {
    let object = value
        .as_object()
        .ok_or_else(|| ItineraryError::schema(path, "expected a day object"))?;

    let day = match object.get("day") {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(raw)) => raw.trim().parse::<u64>().ok(),
        _ => None,
    }
    .filter(|day| *day >= 1)
    .ok_or_else(|| ItineraryError::schema(format!("{}.day", path), "expected an integer >= 1"))?;

    let date = object
        .get("date")
        .and_then(Value::as_str)
        .and_then(|raw| parse_calendar_date(raw).ok())
        .ok_or_else(|| ItineraryError::schema(format!("{}.date", path), "expected an ISO date"))?;

    let references = object
        .get("attractions")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ItineraryError::schema(format!("{}.attractions", path), "expected an array")
        })?;
    let attractions = references
        .iter()
        .enumerate()
        .map(|(i, reference)| index.resolve(reference, &format!("{}.attractions[{}]", path, i)))
        .collect::<Result<Vec<_>>>()?;

    Ok(ProposedDay {
        day: day as usize,
        date,
        attractions,
        start_time: clock_field(object, "startTime"),
        end_time: clock_field(object, "endTime"),
        best_time: clock_field(object, "bestTime"),
    })
}

/// Unparseable times are dropped rather than rejected; defaults fill the gap later.
fn clock_field(object: &Map<String, Value>, key: &str) -> Option<ClockTime> {
    object.get(key)?.as_str()?.parse().ok()
}
