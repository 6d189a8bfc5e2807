use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use harvest_api::application::auth_service::AuthService;
use harvest_api::application::production_service::ProductionService;
use harvest_api::data::memory::InMemoryFarmStore;
use harvest_api::data::user_repository::InMemoryUserRepository;
use harvest_api::domain::error::StoreError;
use harvest_api::domain::repository::PropertyRepository;
use harvest_api::infrastructure::config::AppConfig;
use harvest_api::infrastructure::logging::init_logging;
use harvest_api::presentation::handlers::AppState;
use harvest_api::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use harvest_api::presentation::routes::{self, ROUTES};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

#[tokio::main]
#[instrument]
async fn main() -> std::io::Result<()> {
    init_logging();
    info!("Logging initialized successfully");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::other(e)
    })?;
    info!(
        address = %config.bind_address(),
        token_ttl_secs = config.token.ttl_secs,
        "Configuration loaded"
    );

    let user_repository = InMemoryUserRepository::new();
    let farm_store = InMemoryFarmStore::new();
    for name in &config.seed_properties {
        match farm_store.save_property(name).await {
            Ok(property) => info!(property_id = property.id, name = %name, "Property seeded"),
            Err(StoreError::UniqueViolation(_)) => warn!(name = %name, "Duplicate seed property"),
            Err(e) => {
                error!(name = %name, error = %e, "Failed to seed property");
                return Err(std::io::Error::other(e));
            }
        }
    }

    let state = web::Data::new(AppState {
        auth_service: Arc::new(AuthService::new(
            Arc::new(user_repository),
            config.token.clone(),
        )),
        production_service: Arc::new(ProductionService::new(Arc::new(farm_store))),
    });
    info!("Application state initialized");

    let jwt_secret = config.token.secret.clone();
    let cors_origin = config.cors_allowed_origin.clone();
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };
        App::new()
            .app_data(state.clone())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .configure(|cfg| routes::configure(cfg, &jwt_secret))
    });

    let bind_addr = config.bind_address();
    let server = server.bind(bind_addr.as_str())?;
    info!(address = %bind_addr, routes = %ROUTES, "Starting HTTP server");
    server.run().await
}
