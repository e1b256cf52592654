pub mod day_allocator;
pub mod generation_client;
pub mod itinerary_service;
pub mod payload_validator;
pub mod prompt_builder;
pub mod response_extractor;

pub use generation_client::{GeminiClient, TextGenerator};
pub use itinerary_service::ItineraryService;
