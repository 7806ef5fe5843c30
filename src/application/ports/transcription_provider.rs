use async_trait::async_trait;

use crate::domain::{AudioSource, TranscriptSegment, TranscriptionRequest};

/// One transcription backend. Implementations classify their own failures
/// so the orchestrator can decide between retry, fallback and giving up
/// without knowing backend specifics.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn attempt_transcribe(
        &self,
        data: &[u8],
        source: &AudioSource,
        request: &TranscriptionRequest,
    ) -> Result<ProviderTranscript, ProviderFailure>;
}

/// Backend-agnostic transcript payload, before a provider id is stamped on.
#[derive(Debug, Clone)]
pub struct ProviderTranscript {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    pub language: Option<String>,
    pub duration_secs: Option<f64>,
}

/// A single attempt's failure, already mapped to the retry taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum ProviderFailure {
    #[error("authentication rejected: {0}")]
    Authentication(String),
    #[error("quota or rate limit exhausted: {0}")]
    QuotaExceeded(String),
    #[error("transient network failure: {0}")]
    Transient(String),
    #[error("audio rejected: {0}")]
    UnsupportedAudio(String),
    #[error("provider internal failure: {0}")]
    Internal(String),
}

impl ProviderFailure {
    /// Only transient failures are worth another attempt against the same
    /// provider.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderFailure::Transient(_))
    }
}
