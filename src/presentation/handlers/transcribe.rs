use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Serialize;

use crate::application::services::TranscribeError;
use crate::domain::{
    AudioSource, ProviderId, ResponseVerbosity, StoragePath, TranscriptSegment,
    TranscriptionRequest, TranscriptionResult, is_supported_audio,
};
use crate::presentation::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeResponse {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    pub language: Option<String>,
    pub duration: Option<f64>,
    pub provider_used: ProviderId,
}

impl From<TranscriptionResult> for TranscribeResponse {
    fn from(result: TranscriptionResult) -> Self {
        Self {
            text: result.text,
            segments: result.segments,
            language: result.language,
            duration: result.duration_secs,
            provider_used: result.provider,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

fn reject(status: StatusCode, error: &str, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<(String, String, Bytes)> = None;
    let mut language: Option<String> = None;
    let mut prompt: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart body");
                return reject(
                    StatusCode::BAD_REQUEST,
                    "Invalid upload",
                    format!("Failed to read multipart body: {}", e),
                );
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => {
                let filename = field.file_name().unwrap_or("unknown").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = match field.bytes().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read audio bytes");
                        return reject(
                            StatusCode::PAYLOAD_TOO_LARGE,
                            "File too large or unreadable",
                            format!("Failed to read audio file: {}", e),
                        );
                    }
                };
                upload = Some((filename, mime_type, data));
            }
            Some("language") => language = field.text().await.ok(),
            Some("prompt") => prompt = field.text().await.ok(),
            _ => {}
        }
    }

    let Some((filename, mime_type, data)) = upload else {
        tracing::warn!("Transcription request with no audio file");
        return reject(
            StatusCode::BAD_REQUEST,
            "No audio file provided",
            "Attach the recording as the multipart field \"audio\".".to_string(),
        );
    };

    tracing::debug!(
        filename = %filename,
        mime_type = %mime_type,
        bytes = data.len(),
        "Processing audio upload"
    );

    if !is_supported_audio(&filename, &mime_type) {
        tracing::warn!(filename = %filename, mime_type = %mime_type, "Unsupported upload type");
        return reject(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Only audio files are allowed",
            format!(
                "\"{}\" ({}) is not a recognized audio format. Fix your upload and try again.",
                filename, mime_type
            ),
        );
    }

    let max_bytes = state.settings.server.max_upload_mb * 1024 * 1024;
    if data.len() > max_bytes {
        tracing::warn!(bytes = data.len(), max_bytes, "Upload over size limit");
        return reject(
            StatusCode::PAYLOAD_TOO_LARGE,
            "File too large",
            format!(
                "Maximum file size is {}MB. Fix your upload and try again.",
                state.settings.server.max_upload_mb
            ),
        );
    }

    let storage_path = StoragePath::for_upload(&filename);
    let size_bytes = data.len() as u64;

    if let Err(e) = state.staging_store.store(&storage_path, data).await {
        tracing::error!(error = %e, "Failed to stage audio upload");
        return reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Upload staging failed",
            format!("Could not persist the upload: {}", e),
        );
    }

    let source = AudioSource::new(filename, mime_type, size_bytes, storage_path);
    let request = TranscriptionRequest::new(language, prompt, ResponseVerbosity::Timed);

    match state.transcription_service.transcribe(source, request).await {
        Ok(result) => {
            tracing::info!(provider = %result.provider, "Transcription request completed");
            (StatusCode::OK, Json(TranscribeResponse::from(result))).into_response()
        }
        Err(error) => {
            tracing::error!(error = %error, "Transcription request failed");
            transcribe_error_response(&error)
        }
    }
}

/// Terminal errors carry an actionable message: configuration problems say
/// what to configure, transient problems say to retry, input problems say
/// to fix the upload.
fn transcribe_error_response(error: &TranscribeError) -> Response {
    let (status, label, advice) = match error {
        TranscribeError::ProviderUnavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            "No transcription provider configured",
            "Add OpenAI or Groq API credentials, or enable the local model, then restart.",
        ),
        TranscribeError::Authentication(_) => (
            StatusCode::BAD_GATEWAY,
            "Transcription provider rejected credentials",
            "The configured API key is invalid, expired or revoked. Update the provider credentials.",
        ),
        TranscribeError::QuotaExceeded(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            "Transcription quota exhausted",
            "Every configured provider reported a rate or billing limit. Retry later or review your plan.",
        ),
        TranscribeError::TransientNetwork(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "Transcription provider unreachable",
            "Network failures persisted across retries and fallbacks. Retry later.",
        ),
        TranscribeError::UnsupportedInput(_) => (
            StatusCode::BAD_REQUEST,
            "Audio input unusable",
            "The uploaded file could not be processed as audio. Fix your upload and try again.",
        ),
    };

    reject(status, label, format!("{} ({})", advice, error))
}
