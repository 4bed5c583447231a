use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::errorlog::ErrorEntry;
use crate::services::{chat, selector};

use super::state::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub text: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Runs the send pipeline for one user message
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<chat::ChatReply>> {
    if request.message.trim().is_empty() {
        return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
    }

    let reply = chat::handle_message(&state, &request.message).await;
    Ok(Json(reply))
}

/// First bot message: the welcome text, or the load-error text when the
/// catalog could not be populated
pub async fn greeting(State(state): State<AppState>) -> Json<GreetingResponse> {
    let text = if state.catalog.is_some() {
        chat::WELCOME_MESSAGE
    } else {
        chat::LOAD_ERROR_MESSAGE
    };

    Json(GreetingResponse {
        text: text.to_string(),
    })
}

/// The preset quick-suggestion phrases
pub async fn suggestions() -> Json<[&'static str; 4]> {
    Json(selector::QUICK_SUGGESTIONS)
}

/// Lists all recorded errors, oldest first
pub async fn get_errors(State(state): State<AppState>) -> Json<Vec<ErrorEntry>> {
    Json(state.error_log.snapshot().await)
}

/// Clears the error log
pub async fn clear_errors(State(state): State<AppState>) -> StatusCode {
    state.error_log.clear().await;
    StatusCode::NO_CONTENT
}
