// PV Forecast API v0.1
use axum::http::Method;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod routes;
mod services;
mod state;
mod store;
mod views;

use config::AppConfig;
use state::AppState;

/// PV Forecast API OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PV Forecast API",
        version = "0.1.0",
        description = "Hourly PV energy prediction. Fetches solar irradiance from Open-Meteo \
            for a location and time window, estimates hourly energy output from the \
            stored PV system configuration, and serves the latest run as CSV and JSON.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Predictions", description = "Prediction runs and results"),
        (name = "Location", description = "Stored coordinates"),
        (name = "PV configuration", description = "Panel and inverter configuration"),
    ),
    paths(
        routes::health::health_check,
        routes::predict::predict,
        routes::predictions::get_energy_data,
        routes::predictions::download_predictions_csv,
        routes::predictions::download_irradiance_csv,
        routes::location::get_coordinates,
        routes::pv_config::submit_pv,
        routes::pv_config::check_pv_config,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::predict::PredictRequest,
            routes::predict::PredictResponse,
            routes::pv_config::PvConfigRequest,
            routes::pv_config::PvConfigStatus,
            routes::pv_config::MessageResponse,
            services::prediction_file::HourlyEstimate,
            store::coordinates::CoordinateLookup,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pv_forecast_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Data directory: {}, coordinates: {}, PV config: {}",
        config.data_dir.display(),
        config.coords_file.display(),
        config.pv_config_file.display()
    );

    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        tracing::warn!(
            "Could not create data directory {}: {}",
            config.data_dir.display(),
            e
        );
    }

    let app_state = AppState::from_config(&config);

    // Browser front end posts JSON and forms
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::router(app_state))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
