use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::ports::ChatClientError;
use crate::application::services::RefinementError;
use crate::domain::ChatTurn;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Deserialize)]
pub struct RefineRequest {
    pub transcript: String,
    pub instruction: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineResponse {
    pub refined_text: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[tracing::instrument(skip(state, request), fields(history_len = request.history.len()))]
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if request.message.trim().is_empty() {
        tracing::warn!("Chat request with empty message");
        return error_response(
            StatusCode::BAD_REQUEST,
            "Message is required",
            "Send the instruction or question as \"message\".".to_string(),
        );
    }

    tracing::debug!(message = %sanitize_prompt(&request.message), "Processing chat request");

    match state
        .refinement_service
        .converse(&request.transcript, &request.message, &request.history)
        .await
    {
        Ok(reply) => {
            tracing::info!("Chat request completed");
            (StatusCode::OK, Json(ChatResponse { reply })).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "Chat request failed");
            refinement_error_response(&error)
        }
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn refine_handler(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Response {
    if request.transcript.trim().is_empty() || request.instruction.trim().is_empty() {
        tracing::warn!("Refine request missing transcript or instruction");
        return error_response(
            StatusCode::BAD_REQUEST,
            "Transcript and instruction are required",
            "Send the current transcript and the refinement instruction.".to_string(),
        );
    }

    tracing::debug!(
        instruction = %sanitize_prompt(&request.instruction),
        "Processing refine request"
    );

    match state
        .refinement_service
        .refine(&request.transcript, &request.instruction)
        .await
    {
        Ok(refined_text) => {
            tracing::info!("Refine request completed");
            (StatusCode::OK, Json(RefineResponse { refined_text })).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "Refine request failed");
            refinement_error_response(&error)
        }
    }
}

fn refinement_error_response(error: &RefinementError) -> Response {
    match error {
        RefinementError::ProviderUnavailable => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "No chat provider configured",
            "Add chat API credentials, then restart.".to_string(),
        ),
        RefinementError::Client(ChatClientError::RateLimited) => error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Chat provider rate limited",
            "The chat provider reported a rate limit. Retry later.".to_string(),
        ),
        RefinementError::Client(e) => error_response(
            StatusCode::BAD_GATEWAY,
            "Chat request failed",
            format!("The chat provider returned an error: {}", e),
        ),
    }
}

fn error_response(status: StatusCode, error: &str, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
        .into_response()
}
