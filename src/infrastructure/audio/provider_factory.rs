use std::sync::Arc;

use crate::application::services::ProviderCandidate;
use crate::domain::ProviderId;
use crate::presentation::config::TranscriptionSettings;

use super::candle_whisper_provider::{CandleWhisperProvider, ModelLoadError};
use super::whisper_api_provider::{GROQ_BASE_URL, WhisperApiProvider};

/// Builds the ordered candidate list from configuration: first configured
/// remote is the primary, second the alternate, local model last. Remote
/// candidates exist only when their API key is present.
pub fn build_provider_candidates(
    settings: &TranscriptionSettings,
) -> Result<Vec<ProviderCandidate>, ModelLoadError> {
    let mut candidates = Vec::new();

    if let Some(api_key) = settings.openai.api_key.clone() {
        let model = settings
            .openai
            .model
            .clone()
            .unwrap_or_else(|| "whisper-1".to_string());
        let provider = WhisperApiProvider::new(api_key, settings.openai.base_url.clone(), model);
        let id = remote_slot(&candidates);
        tracing::info!(provider = %id, backend = "openai", "Remote transcription candidate configured");
        candidates.push(ProviderCandidate::new(id, Arc::new(provider)));
    }

    if let Some(api_key) = settings.groq.api_key.clone() {
        let base_url = settings
            .groq
            .base_url
            .clone()
            .or_else(|| Some(GROQ_BASE_URL.to_string()));
        let model = settings
            .groq
            .model
            .clone()
            .unwrap_or_else(|| "whisper-large-v3".to_string());
        let provider = WhisperApiProvider::new(api_key, base_url, model);
        let id = remote_slot(&candidates);
        tracing::info!(provider = %id, backend = "groq", "Remote transcription candidate configured");
        candidates.push(ProviderCandidate::new(id, Arc::new(provider)));
    }

    if settings.local.enabled {
        let provider = CandleWhisperProvider::new(&settings.local.model)?;
        tracing::info!(
            provider = %ProviderId::LocalFallback,
            model = %settings.local.model,
            "Local transcription candidate configured"
        );
        candidates.push(ProviderCandidate::new(
            ProviderId::LocalFallback,
            Arc::new(provider),
        ));
    }

    if candidates.is_empty() {
        tracing::warn!("No transcription backend configured; requests will be rejected");
    }

    Ok(candidates)
}

fn remote_slot(candidates: &[ProviderCandidate]) -> ProviderId {
    if candidates.is_empty() {
        ProviderId::Primary
    } else {
        ProviderId::Alternate
    }
}
