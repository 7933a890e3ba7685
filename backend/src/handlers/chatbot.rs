//! HTTP handlers for follow-up questions

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::advisory::{ChatAnswer, ChatInput};
use crate::services::AdvisoryService;
use crate::AppState;

/// Answer a question about an identified plant
pub async fn chatbot(
    State(state): State<AppState>,
    Json(input): Json<ChatInput>,
) -> AppResult<Json<ChatAnswer>> {
    let service = AdvisoryService::new(&state);
    let answer = service.chat(input).await?;
    Ok(Json(answer))
}
