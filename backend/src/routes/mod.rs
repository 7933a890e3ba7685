//! Route definitions for the Crop Advisory Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Identification and fused reference data
        .route("/analyze", post(handlers::analyze_plant))
        // Forecast disease risk and spraying advice
        .route("/weather", post(handlers::weather_advisory))
        // Follow-up questions
        .route("/chatbot", post(handlers::chatbot))
        .nest("/databases", database_routes())
}

/// Reference database routes
fn database_routes() -> Router<AppState> {
    Router::new().route("/status", get(handlers::database_status))
}
