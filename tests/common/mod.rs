#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

use trip_itinerary_api::error::{ItineraryError, Result};
use trip_itinerary_api::models::{Attraction, DateRange};
use trip_itinerary_api::routes;
use trip_itinerary_api::services::{ItineraryService, TextGenerator};

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Unavailable,
    Empty,
}

/// Generation backend stand-in. Replies are handed out in order and the last one repeats.
pub struct StubGenerator {
    replies: Vec<Reply>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::new(vec![Reply::Text(text.into())])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        let reply = self
            .replies
            .get(call)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or(Reply::Empty);
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Unavailable => Err(ItineraryError::backend("stub backend is down")),
            Reply::Empty => Err(ItineraryError::EmptyGeneration),
        }
    }
}

pub fn service_with(generator: Arc<StubGenerator>) -> ItineraryService {
    ItineraryService::new(generator)
}

pub fn create_app(
    service: ItineraryService,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Cors::permissive())
        .wrap(Logger::default())
        .app_data(web::Data::new(service))
        .configure(routes::configure)
}

pub fn ahmedabad_range() -> DateRange {
    "2025-04-25 to 2025-04-27".parse().unwrap()
}

pub fn ahmedabad_attractions_json() -> Value {
    json!([
        {
            "id": "sabarmati-ashram",
            "name": "Sabarmati Ashram",
            "description": "Gandhi's riverside home and museum.",
            "category": "Historical",
            "rating": 4.6,
            "visitDuration": "1-2 hours",
            "bestTime": "Morning",
            "location": {"latitude": 23.0607, "longitude": 72.5808},
            "image": ""
        },
        {
            "id": "adalaj-stepwell",
            "name": "Adalaj Stepwell",
            "description": "Five-storey stepwell with carved pillars.",
            "category": "Architecture",
            "rating": 4.5,
            "visitDuration": "1 hour",
            "bestTime": "Morning",
            "location": {"latitude": 23.1668, "longitude": 72.5801}
        },
        {
            "id": "kankaria-lake",
            "name": "Kankaria Lake",
            "description": "Lakefront promenade with a zoo and toy train.",
            "category": "Leisure",
            "rating": 4.3,
            "visitDuration": "2-3 hours",
            "bestTime": "Evening",
            "location": {"latitude": 22.9986, "longitude": 72.6006}
        },
        {
            "id": "calico-museum",
            "name": "Calico Museum of Textiles",
            "description": "Textile collection in the Sarabhai house.",
            "category": "Museum",
            "rating": 4.7,
            "visitDuration": "2 hours",
            "bestTime": "Morning",
            "location": {"latitude": 23.0473, "longitude": 72.5929}
        },
        {
            "id": "sidi-saiyyed-mosque",
            "name": "Sidi Saiyyed Mosque",
            "description": "Known for its stone lattice windows.",
            "category": "Religious",
            "rating": 4.5,
            "visitDuration": "30 minutes",
            "bestTime": "Afternoon",
            "location": {"latitude": 23.0271, "longitude": 72.5808}
        },
        {
            "id": "manek-chowk",
            "name": "Manek Chowk",
            "description": "Old city square turned night food market.",
            "category": "Food",
            "rating": 4.2,
            "visitDuration": "1-2 hours",
            "bestTime": "Night",
            "location": {"latitude": 23.0237, "longitude": 72.5873}
        }
    ])
}

/// Search reply the way the backend tends to answer: prose around a fenced block, with a
/// stray comment inside the payload.
pub fn ahmedabad_search_reply() -> String {
    let payload = serde_json::to_string_pretty(&ahmedabad_attractions_json()).unwrap();
    let payload = payload.replacen('[', "[ // top picks for a 3 day visit", 1);
    format!(
        "Here are some attractions for your trip to Ahmedabad:\n\n```json\n{}\n```\n\nLet me know if you want more [options].",
        payload
    )
}

pub fn ahmedabad_attractions() -> Vec<Attraction> {
    serde_json::from_value(ahmedabad_attractions_json()).unwrap()
}

pub fn ids(attractions: &[Attraction]) -> Vec<String> {
    attractions.iter().map(|a| a.id.clone()).collect()
}
