use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use trip_itinerary_api::config::AppConfig;
use trip_itinerary_api::routes;
use trip_itinerary_api::services::{GeminiClient, ItineraryService};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("{}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let client = GeminiClient::new(&config.gemini)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let service = web::Data::new(ItineraryService::with_timeout(
        Arc::new(client),
        config.gemini.timeout(),
    ));

    log::info!(
        "Using model {} with a {}s generation timeout",
        config.gemini.model,
        config.gemini.timeout_secs
    );
    log::info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(service.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
