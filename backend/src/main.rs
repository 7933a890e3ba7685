//! Crop Advisory Platform - Backend Server
//!
//! Identifies plants and diseases from photos, voice notes or descriptions,
//! fuses the result with reference tables, and turns weather forecasts into
//! disease-risk and spraying advice.

use axum::{routing::get, Router};
use shared::RuleTable;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

#[cfg(test)]
mod test_support;

use crate::config::{AdvisoryConfig, Config};
use external::{GeminiClient, Identifier, WeatherClient, WeatherSource};
use services::{PgReferenceSource, ReferenceSource};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<RuleTable>,
    pub identifier: Arc<dyn Identifier>,
    pub weather: Arc<dyn WeatherSource>,
    pub plant_source: Arc<dyn ReferenceSource>,
    pub solution_source: Arc<dyn ReferenceSource>,
    pub defaults: Arc<AdvisoryConfig>,
    pub query_timeout: Duration,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advisory_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Crop Advisory Server");
    tracing::info!("Environment: {}", config.environment);

    if config.identifier.api_key.is_empty() {
        tracing::warn!("Identifier API key is not set; analysis and chat requests will fail");
    }
    if config.weather.api_key.is_empty() {
        tracing::warn!("Weather API key is not set; weather advisories will fail");
    }

    // Lookups degrade to "not found" while the database is unreachable
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect_lazy(&config.database.url)?;

    let rules = RuleTable::standard();
    tracing::info!(
        crops = rules.crops().count(),
        rules = rules.len(),
        "Disease rule table loaded"
    );

    let identifier = GeminiClient::new(
        config.identifier.api_endpoint.clone(),
        config.identifier.api_key.clone(),
        config.identifier.model.clone(),
        Duration::from_secs(config.identifier.timeout_secs),
    )?;
    let weather = WeatherClient::new(
        config.weather.api_key.clone(),
        config.weather.api_endpoint.clone(),
        config.weather.forecast_days,
        Duration::from_secs(config.weather.timeout_secs),
    )?;

    // Create application state
    let state = AppState {
        rules: Arc::new(rules),
        identifier: Arc::new(identifier),
        weather: Arc::new(weather),
        plant_source: Arc::new(PgReferenceSource::new(
            db_pool.clone(),
            &config.reference.plant,
        )?),
        solution_source: Arc::new(PgReferenceSource::new(db_pool, &config.reference.solution)?),
        defaults: Arc::new(config.advisory.clone()),
        query_timeout: Duration::from_secs(config.database.query_timeout_secs),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = config.bind_address();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Advisory Platform API v1.0"
}
