pub mod attractions;
pub mod health;
pub mod plan;

use actix_web::{error::InternalError, http::StatusCode, web, HttpResponse};
use serde_json::Value;

use crate::error::{ItineraryError, Result};
use crate::models::api::ErrorResponse;
use crate::models::DateRange;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/itinerary")
                .route("/search", web::post().to(attractions::search_attractions))
                .route("/plan", web::post().to(plan::create_plan)),
        );
}

/// Unreadable bodies get the same `{"error": ..}` shape as every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected request body: {}", err);
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid request body".to_string(),
        });
        InternalError::from_response(err, response).into()
    })
}

pub(crate) fn bad_request<S: Into<String>>(message: S) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: message.into(),
    })
}

/// Input errors keep their message. Anything else is logged by the caller and answered
/// with `generic`, as 503 when a retry may help and 500 otherwise.
pub(crate) fn failure_response(err: &ItineraryError, generic: &str) -> HttpResponse {
    let status = match err {
        ItineraryError::InvalidInput(message) => return bad_request(message.clone()),
        err if err.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status).json(ErrorResponse {
        error: generic.to_string(),
    })
}

pub(crate) fn parse_date_range(raw: Option<Value>) -> Result<DateRange> {
    let raw = raw
        .filter(|value| !value.is_null())
        .ok_or_else(|| ItineraryError::invalid_input("Date range is required"))?;
    serde_json::from_value(raw).map_err(|e| ItineraryError::invalid_input(e.to_string()))
}
