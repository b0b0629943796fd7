use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use resale_match::config::Settings;
use resale_match::core::MatchingEngine;
use resale_match::routes::{self, AppState};
use resale_match::services::{CatalogStore, InMemoryCatalog, ProductService};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    init_tracing(&log_level, &log_format);

    info!("Starting Resale Match service...");

    // A misconfigured weight set must never run
    let weights = settings.scoring_weights();
    let engine = MatchingEngine::new(weights, settings.matching.min_confidence, Vec::<String>::new())
        .map_err(|e| {
            error!("Invalid matching configuration: {}", e);
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
        })?;

    info!(
        "Matching engine initialized with weights: {:?}, threshold: {}%",
        weights,
        engine.min_confidence()
    );

    let products = match &settings.catalog.path {
        Some(path) => {
            let catalog = InMemoryCatalog::load(path).map_err(|e| {
                error!("Failed to load catalog from {}: {}", path, e);
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
            })?;
            let catalog: Arc<dyn CatalogStore> = Arc::new(catalog);
            Some(ProductService::new(catalog))
        }
        None => {
            info!("No catalog configured, products must be supplied per request");
            None
        }
    };

    let app_state = AppState {
        engine,
        products,
        max_listings: settings.matching.max_listings,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
