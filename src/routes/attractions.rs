use actix_web::{web, HttpResponse, Responder};

use crate::models::api::{SearchRequest, SearchResponse};
use crate::routes::{bad_request, failure_response, parse_date_range};
use crate::services::ItineraryService;

/*
    /api/itinerary/search
*/
pub async fn search_attractions(
    service: web::Data<ItineraryService>,
    body: web::Json<SearchRequest>,
) -> impl Responder {
    let request = body.into_inner();

    let destination = match request.destination.as_deref().map(str::trim) {
        Some(destination) if !destination.is_empty() => destination.to_string(),
        _ => return bad_request("Destination is required"),
    };
    let range = match parse_date_range(request.date_range) {
        Ok(range) => range,
        Err(err) => return bad_request(err.user_message()),
    };

    match service.search_attractions(&destination, &range).await {
        Ok(attractions) => HttpResponse::Ok().json(SearchResponse { attractions }),
        Err(err) => {
            log::error!("Attraction search for '{}' failed: {}", destination, err);
            failure_response(&err, "Failed to search attractions")
        }
    }
}
