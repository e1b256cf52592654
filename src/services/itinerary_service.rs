use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{ItineraryError, Result};
use crate::models::attraction::clamp_rating;
use crate::models::{Attraction, DateRange, DayPlan, PlanSource, TripPlan};
use crate::services::day_allocator::{self, DayTiming};
use crate::services::generation_client::TextGenerator;
use crate::services::payload_validator;
use crate::services::prompt_builder;
use crate::services::response_extractor::{self, PayloadShape};

/// Why the backend's grouping was set aside, plus any per-day times still worth keeping.
struct Fallback {
    reason: String,
    timings: BTreeMap<usize, DayTiming>,
}

impl Fallback {
    fn from_error(err: ItineraryError) -> Self {
        Self {
            reason: err.to_string(),
            timings: BTreeMap::new(),
        }
    }
}

/// Runs the search and plan pipelines against a text generator.
///
/// Holds no mutable state; one instance can serve any number of concurrent requests.
#[derive(Clone)]
pub struct ItineraryService {
    generator: Arc<dyn TextGenerator>,
    generation_timeout: Option<Duration>,
}

impl ItineraryService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            generation_timeout: None,
        }
    }

    pub fn with_timeout(generator: Arc<dyn TextGenerator>, timeout: Option<Duration>) -> Self {
        Self {
            generator,
            generation_timeout: timeout,
        }
    }

    fn default_deadline(&self) -> Option<Instant> {
        self.generation_timeout
            .map(|timeout| Instant::now() + timeout)
    }

    async fn generate_until(&self, prompt: &str, deadline: Option<Instant>) -> Result<String> {
        let call = self.generator.generate(prompt);
        match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, call)
                .await
                .map_err(|_| ItineraryError::backend("generation timed out before the deadline"))?,
            None => call.await,
        }
    }

    pub async fn search_attractions(
        &self,
        destination: &str,
        range: &DateRange,
    ) -> Result<Vec<Attraction>> {
        self.search_attractions_until(destination, range, self.default_deadline())
            .await
    }

    /// Any failure is returned as is: there is nothing to fall back to for a search.
    pub async fn search_attractions_until(
        &self,
        destination: &str,
        range: &DateRange,
        deadline: Option<Instant>,
    ) -> Result<Vec<Attraction>> {
        let prompt = prompt_builder::build_search_prompt(destination, range)?;
        log::debug!("Search prompt for '{}':\n{}", destination.trim(), prompt);

        let text = self.generate_until(&prompt, deadline).await?;
        let payload = response_extractor::extract(&text, PayloadShape::AttractionList)?;
        let attractions = payload_validator::validate_attractions(&payload)?;

        log::info!(
            "Found {} attractions for '{}' over {} days",
            attractions.len(),
            destination.trim(),
            range.day_count()
        );
        Ok(attractions)
    }

    pub async fn plan_trip(&self, attractions: &[Attraction], range: &DateRange) -> Result<TripPlan> {
        self.plan_trip_until(attractions, range, self.default_deadline())
            .await
    }

    /// Only input errors and generation failures surface. A payload that cannot be
    /// extracted, validated, or that breaks coverage is replaced by the day allocator.
    pub async fn plan_trip_until(
        &self,
        attractions: &[Attraction],
        range: &DateRange,
        deadline: Option<Instant>,
    ) -> Result<TripPlan> {
        let attractions = &normalize_plan_input(attractions)?;

        let prompt = prompt_builder::build_plan_prompt(attractions, range)?;
        log::debug!("Plan prompt for {} attractions:\n{}", attractions.len(), prompt);

        let text = self.generate_until(&prompt, deadline).await?;

        let plan = match plan_from_backend(&text, attractions, range) {
            Ok(plan) => plan,
            Err(fallback) => {
                log::warn!(
                    "Falling back to even allocation of {} attractions over {} days: {}",
                    attractions.len(),
                    range.day_count(),
                    fallback.reason
                );
                day_allocator::allocate(attractions, range, &fallback.timings)
            }
        };

        plan.check_invariants(range, attractions)
            .map_err(|reason| ItineraryError::schema("plan", reason))?;

        log::info!(
            "Planned {} attractions over {} days ({:?})",
            plan.attraction_count(),
            plan.days.len(),
            plan.source
        );
        Ok(plan)
    }
}

/// Ids must be present and unique. Ratings are clamped the same way search results are.
fn normalize_plan_input(attractions: &[Attraction]) -> Result<Vec<Attraction>> {
    if attractions.is_empty() {
        return Err(ItineraryError::invalid_input("Attractions are required"));
    }

    let mut seen = HashSet::new();
    for attraction in attractions {
        if attraction.id.trim().is_empty() {
            return Err(ItineraryError::invalid_input(format!(
                "Attraction '{}' has no id",
                attraction.name
            )));
        }
        if !seen.insert(attraction.id.as_str()) {
            return Err(ItineraryError::invalid_input(format!(
                "Attraction id '{}' appears more than once",
                attraction.id
            )));
        }
    }

    Ok(attractions
        .iter()
        .map(|attraction| Attraction {
            rating: clamp_rating(attraction.rating),
            ..attraction.clone()
        })
        .collect())
}

fn plan_from_backend(
    text: &str,
    attractions: &[Attraction],
    range: &DateRange,
) -> std::result::Result<TripPlan, Fallback> {
    let payload =
        response_extractor::extract(text, PayloadShape::DayPlan).map_err(Fallback::from_error)?;
    let mut proposed = payload_validator::validate_day_plans(&payload, attractions)
        .map_err(Fallback::from_error)?;
    proposed.sort_by_key(|day| day.day);

    let timings: BTreeMap<usize, DayTiming> = proposed
        .iter()
        .filter(|day| day.day <= range.day_count())
        .map(|day| {
            (
                day.day,
                DayTiming::from_suggestion(day.start_time, day.end_time, day.best_time),
            )
        })
        .collect();

    let days = proposed
        .into_iter()
        .map(|proposal| {
            let timing = timings.get(&proposal.day).copied().unwrap_or_default();
            let date = range.date_for_day(proposal.day).unwrap_or(proposal.date);
            if date != proposal.date {
                log::debug!(
                    "Day {} was dated {} by the backend, using {}",
                    proposal.day,
                    proposal.date,
                    date
                );
            }
            DayPlan {
                day: proposal.day,
                date,
                attractions: proposal.attractions,
                start_time: timing.start,
                end_time: timing.end,
                best_time: timing.best,
            }
        })
        .collect();

    let plan = TripPlan {
        days,
        source: PlanSource::Backend,
    };
    match plan.check_invariants(range, attractions) {
        Ok(()) => Ok(plan),
        Err(reason) => Err(Fallback { reason, timings }),
    }
}
