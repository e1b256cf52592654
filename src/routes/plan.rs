use actix_web::{web, HttpResponse, Responder};

use crate::models::api::PlanRequest;
use crate::routes::{bad_request, failure_response, parse_date_range};
use crate::services::ItineraryService;

/*
    /api/itinerary/plan
*/
pub async fn create_plan(
    service: web::Data<ItineraryService>,
    body: web::Json<PlanRequest>,
) -> impl Responder {
    let request = body.into_inner();

    let attractions = match request.attractions {
        Some(attractions) if !attractions.is_empty() => attractions,
        _ => return bad_request("Attractions are required"),
    };
    let range = match parse_date_range(request.date_range) {
        Ok(range) => range,
        Err(err) => return bad_request(err.user_message()),
    };

    match service.plan_trip(&attractions, &range).await {
        Ok(plan) => HttpResponse::Ok().json(plan),
        Err(err) => {
            log::error!(
                "Trip plan for {} attractions over {} failed: {}",
                attractions.len(),
                range,
                err
            );
            failure_response(&err, "Failed to create trip plan")
        }
    }
}
