use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{ProviderFailure, ProviderTranscript, TranscriptionProvider};
use crate::domain::{AudioSource, ResponseVerbosity, TranscriptSegment, TranscriptionRequest};

use super::error_classification::{classify_error_response, classify_transport_error};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Remote Whisper backend speaking the OpenAI `audio/transcriptions`
/// protocol. Groq exposes the same protocol, so both remote candidates are
/// instances of this type pointed at different base URLs.
pub struct WhisperApiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl WhisperApiProvider {
    pub fn new(api_key: String, base_url: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            model,
        }
    }
}

#[derive(Deserialize)]
struct VerboseTranscriptionResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    segments: Vec<VerboseSegment>,
}

#[derive(Deserialize)]
struct VerboseSegment {
    start: f64,
    end: f64,
    text: String,
}

#[derive(Deserialize)]
struct PlainTranscriptionResponse {
    text: String,
}

#[async_trait]
impl TranscriptionProvider for WhisperApiProvider {
    async fn attempt_transcribe(
        &self,
        data: &[u8],
        source: &AudioSource,
        request: &TranscriptionRequest,
    ) -> Result<ProviderTranscript, ProviderFailure> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let response_format = match request.verbosity() {
            ResponseVerbosity::Minimal => "json",
            ResponseVerbosity::Timed => "verbose_json",
        };

        let file_part = multipart::Part::bytes(data.to_vec())
            .file_name(source.filename.clone())
            .mime_str(&source.mime_type)
            .map_err(|e| ProviderFailure::UnsupportedAudio(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("language", request.language().to_string())
            .text("response_format", response_format)
            .text("temperature", "0")
            .part("file", file_part);

        if let Some(prompt) = request.prompt() {
            form = form.text("prompt", prompt.to_string());
        }

        tracing::debug!(
            model = %self.model,
            language = %request.language(),
            response_format,
            bytes = data.len(),
            "Sending audio to Whisper API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(classify_error_response(status, &body));
        }

        let transcript = match request.verbosity() {
            ResponseVerbosity::Minimal => {
                let parsed: PlainTranscriptionResponse = response
                    .json()
                    .await
                    .map_err(|e| ProviderFailure::Transient(format!("parse response: {}", e)))?;
                ProviderTranscript {
                    text: parsed.text.trim().to_string(),
                    segments: Vec::new(),
                    language: None,
                    duration_secs: None,
                }
            }
            ResponseVerbosity::Timed => {
                let parsed: VerboseTranscriptionResponse = response
                    .json()
                    .await
                    .map_err(|e| ProviderFailure::Transient(format!("parse response: {}", e)))?;
                ProviderTranscript {
                    text: parsed.text.trim().to_string(),
                    segments: parsed
                        .segments
                        .into_iter()
                        .map(|s| TranscriptSegment {
                            start: s.start,
                            end: s.end,
                            text: s.text.trim().to_string(),
                        })
                        .collect(),
                    language: parsed.language,
                    duration_secs: parsed.duration,
                }
            }
        };

        tracing::info!(
            chars = transcript.text.len(),
            segments = transcript.segments.len(),
            "Whisper API transcription completed"
        );

        Ok(transcript)
    }
}
