use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::ExportFormat;
use crate::infrastructure::rendering::render;
use crate::presentation::state::AppState;

const DEFAULT_TITLE: &str = "Transcription";

#[derive(Deserialize)]
pub struct ExportRequest {
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[tracing::instrument(skip(_state, request), fields(format = %format))]
pub async fn export_handler(
    State(_state): State<AppState>,
    Path(format): Path<String>,
    Json(request): Json<ExportRequest>,
) -> Response {
    let format: ExportFormat = match format.parse() {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(error = %e, "Export with unsupported format");
            return error_response(
                StatusCode::BAD_REQUEST,
                "Unsupported format",
                format!("{}. Supported: txt, json, srt, vtt, pdf, docx.", e),
            );
        }
    };

    if request.text.is_empty() {
        tracing::warn!("Export request with empty text");
        return error_response(
            StatusCode::BAD_REQUEST,
            "Transcription text is required",
            "Send the transcript to export as \"text\".".to_string(),
        );
    }

    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    match render(format, &request.text, title, Utc::now()) {
        Ok(bytes) => {
            tracing::info!(bytes = bytes.len(), "Export rendered");
            let disposition = format!(
                "attachment; filename=\"{}.{}\"",
                sanitize_title(title),
                format.extension()
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, format.content_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Export rendering failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Export failed",
                format!("Rendering failed: {}", e),
            )
        }
    }
}

/// Keeps the attachment filename header-safe: no quotes, path separators
/// or control characters.
fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        cleaned
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
