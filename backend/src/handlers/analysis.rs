//! HTTP handlers for plant identification

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::advisory::{AnalyzeInput, IdentificationResponse};
use crate::services::AdvisoryService;
use crate::AppState;

/// Identify a plant from an image, voice note or description
pub async fn analyze_plant(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeInput>,
) -> AppResult<Json<IdentificationResponse>> {
    let service = AdvisoryService::new(&state);
    let response = service.analyze(input).await?;
    Ok(Json(response))
}
