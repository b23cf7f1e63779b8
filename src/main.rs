use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use truthlens::config::Config;
use truthlens::errors::{json_config, query_config};
use truthlens::handlers::not_found;
use truthlens::routes::api;
use truthlens::services::TavilySearchProvider;
use truthlens::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing provider key stops here
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let provider = match TavilySearchProvider::new(&config.search) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to initialize search provider: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        trusted_domains = config.trust.domains.len(),
        default_max_results = config.search.default_max_results,
        "Starting TruthLens on port {}",
        config.server.port
    );

    let state = AppState::new(config.clone(), Arc::new(provider));
    let allowed_origins = config.security.allowed_origins.clone();

    // Create HTTP server
    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);
        if allowed_origins.iter().any(|origin| origin == "*") {
            cors = cors.allow_any_origin();
        } else {
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
        }

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .wrap(cors)
            .wrap(Logger::default())
            .service(api::config())
            .default_service(web::route().to(not_found))
    })
    .bind(format!("{}:{}", config.server.host, config.server.port))?;

    info!(
        "Server started successfully at http://{}:{}",
        config.server.host, config.server.port
    );

    // Run the server
    server.workers(config.server.workers).run().await
}
