//! Prompt rendering for the two generation requests.
//!
//! Both builders are pure: the same inputs always render the same text, which keeps the
//! non-deterministic part of the pipeline confined to the backend call.

use crate::error::{ItineraryError, Result};
use crate::models::{Attraction, DateRange};

const ISO_DATE: &str = "%Y-%m-%d";

/// Trips up to this many days get relaxed pacing guidance.
const SMALL_TRIP_DAYS: usize = 3;

pub fn build_search_prompt(destination: &str, range: &DateRange) -> Result<String> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(ItineraryError::invalid_input("Destination is required"));
    }

    let days = range.day_count();
    let small_total = days;
    let large_total = days * 3;
    let pacing = if days <= SMALL_TRIP_DAYS {
        "Keep the pace relaxed; a short trip should not feel rushed."
    } else {
        "Vary the pace so that busier days are followed by lighter ones."
    };

    Ok(format!(
        r#"Generate a list of popular tourist attractions in {destination} for a {days}-day trip during {range}.
Distribute the attractions over the {days} days of the trip, considering the following:
- Include a variety of attractions (landmarks, museums, parks, historical sites, markets, viewpoints).
- If the destination is a large area (a state, a region or a major city), include more attractions, around 2-3 per day (up to {large_total} in total).
- If the destination is a smaller area (a district or a small city), include fewer attractions, around 1-2 per day (at least {small_total} in total).
- Spread the attractions across all {days} days and never overload a single day. {pacing}
- Provide the following details for each attraction:
  - id: a unique identifier (lowercase words joined by hyphens)
  - name
  - description: 1-2 sentences
  - category: e.g. Landmark, Museum, Park, Historical Site
  - rating: a number from 0 to 5
  - visitDuration: recommended visit duration, e.g. "2-3 hours"
  - bestTime: best time of day to visit, e.g. Morning, Afternoon, Evening
  - location: latitude and longitude of the attraction

Respond with a JSON array of attraction objects only. Do not add comments inside the JSON.
Example format:

[
  {{
    "id": "unique-id-1",
    "name": "Attraction Name",
    "description": "Brief description of the attraction.",
    "category": "Category",
    "rating": 4.5,
    "visitDuration": "2-3 hours",
    "bestTime": "Morning",
    "location": {{
      "latitude": 37.7749,
      "longitude": -122.4194
    }}
  }}
]

Include both well-known places and hidden gems. For smaller destinations, highlight the most notable and unique places and avoid redundancy."#,
        destination = destination,
        days = days,
        range = range,
        small_total = small_total,
        large_total = large_total,
        pacing = pacing,
    ))
}

pub fn build_plan_prompt(attractions: &[Attraction], range: &DateRange) -> Result<String> {
    if attractions.is_empty() {
        return Err(ItineraryError::invalid_input("Attractions are required"));
    }

    let days = range.day_count();
    let summary = attractions
        .iter()
        .map(|a| format!("- {} [id: {}] ({}): {}", a.name, a.id, a.category, a.visit_duration))
        .collect::<Vec<_>>()
        .join("\n");
    let calendar = range
        .dates()
        .enumerate()
        .map(|(index, date)| format!("- Day {}: {}", index + 1, date.format(ISO_DATE)))
        .collect::<Vec<_>>()
        .join("\n");
    let attraction_json = serde_json::to_string_pretty(attractions)?;

    Ok(format!(
        r#"Create an optimized daily travel itinerary for a {days}-day trip during {range}.
The itinerary must include every one of the following attractions exactly once:

{summary}

The trip days are:

{calendar}

For each day:
1. Group attractions that are geographically close to each other (use their latitude and longitude).
2. Respect each attraction's visit duration so the schedule stays realistic.
3. Suggest a start time (usually morning) and an end time for the day, plus the best time for the main visit.
4. Distribute the attractions evenly across all {days} days.

Use these attraction objects verbatim in your answer, without changing any field:

{attraction_json}

Respond with a single JSON object and nothing else. Do not add comments inside the JSON.
It must contain a "plan" array with exactly {days} entries, one per day, in this format:

{{
  "plan": [
    {{
      "day": 1,
      "date": "{first_date}",
      "attractions": [ /* complete attraction objects from the list above */ ],
      "startTime": "9:00 AM",
      "endTime": "5:00 PM",
      "bestTime": "12:00 PM"
    }}
  ]
}}"#,
        days = days,
        range = range,
        summary = summary,
        calendar = calendar,
        attraction_json = attraction_json,
        first_date = range.start().format(ISO_DATE),
    ))
}
