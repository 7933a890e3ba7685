//! HTTP handlers for weather advisories

use axum::{extract::State, Json};
use shared::WeatherAdvisory;

use crate::error::AppResult;
use crate::services::advisory::WeatherAdvisoryInput;
use crate::services::AdvisoryService;
use crate::AppState;

/// Disease-risk forecast and spraying advice for a crop at a location
pub async fn weather_advisory(
    State(state): State<AppState>,
    Json(input): Json<WeatherAdvisoryInput>,
) -> AppResult<Json<WeatherAdvisory>> {
    let service = AdvisoryService::new(&state);
    let advisory = service.weather_advisory(input).await?;
    Ok(Json(advisory))
}
