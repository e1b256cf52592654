use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::attraction::Attraction;

/// Body of `POST /api/itinerary/search`. Fields stay loose so missing values surface as
/// a 400 with a readable message instead of a bare deserialisation error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub date_range: Option<Value>,
}

/// Body of `POST /api/itinerary/plan`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub attractions: Option<Vec<Attraction>>,
    #[serde(default)]
    pub date_range: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub attractions: Vec<Attraction>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
