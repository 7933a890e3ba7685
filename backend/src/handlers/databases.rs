//! HTTP handlers for reference database status

use axum::{extract::State, Json};

use crate::services::advisory::DatabaseStatus;
use crate::services::AdvisoryService;
use crate::AppState;

/// Row counts of the plant and solution tables
pub async fn database_status(State(state): State<AppState>) -> Json<DatabaseStatus> {
    let service = AdvisoryService::new(&state);
    Json(service.database_status().await)
}
