use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::application::ports::{
    AudioStagingStore, ProviderFailure, TranscriptionProvider,
};
use crate::domain::{AudioSource, ProviderId, TranscriptionRequest, TranscriptionResult};

/// One configured backend, in fallback order.
pub struct ProviderCandidate {
    pub id: ProviderId,
    pub provider: Arc<dyn TranscriptionProvider>,
}

impl ProviderCandidate {
    pub fn new(id: ProviderId, provider: Arc<dyn TranscriptionProvider>) -> Self {
        Self { id, provider }
    }
}

/// Drives a transcription request through the ordered provider candidates:
/// transient failures are retried with backoff against the same provider,
/// quota and authentication failures advance to the next candidate, and the
/// staged audio is removed exactly once whatever the outcome.
pub struct TranscriptionService {
    candidates: Vec<ProviderCandidate>,
    staging: Arc<dyn AudioStagingStore>,
    max_attempts: u32,
    attempt_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("no transcription provider configured")]
    ProviderUnavailable,
    #[error("provider rejected credentials: {0}")]
    Authentication(String),
    #[error("provider quota exhausted: {0}")]
    QuotaExceeded(String),
    #[error("network failure reaching provider: {0}")]
    TransientNetwork(String),
    #[error("audio input unusable: {0}")]
    UnsupportedInput(String),
}

impl TranscriptionService {
    pub fn new(
        candidates: Vec<ProviderCandidate>,
        staging: Arc<dyn AudioStagingStore>,
        max_attempts: u32,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            candidates,
            staging,
            max_attempts: max_attempts.max(1),
            attempt_timeout,
        }
    }

    /// Transcribes the staged audio behind `source`.
    ///
    /// Runs detached from the caller's future: if the caller disconnects
    /// mid-request the staged file is still removed and the abandoned
    /// result discarded.
    pub async fn transcribe(
        self: &Arc<Self>,
        source: AudioSource,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResult, TranscribeError> {
        let service = Arc::clone(self);
        let handle = tokio::spawn(async move { service.run(source, request).await });

        match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Transcription task aborted");
                Err(TranscribeError::TransientNetwork(
                    "transcription task aborted".to_string(),
                ))
            }
        }
    }

    async fn run(
        &self,
        source: AudioSource,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResult, TranscribeError> {
        let outcome = self.attempt_candidates(&source, &request).await;

        // Removal happens exactly once, on every exit path; a failed
        // delete is not a caller-visible error.
        if let Err(e) = self.staging.delete(source.storage_path()).await {
            tracing::warn!(
                error = %e,
                path = %source.storage_path(),
                "Failed to remove staged audio"
            );
        }

        outcome
    }

    async fn attempt_candidates(
        &self,
        source: &AudioSource,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionResult, TranscribeError> {
        if self.candidates.is_empty() {
            return Err(TranscribeError::ProviderUnavailable);
        }

        let data = self
            .staging
            .fetch(source.storage_path())
            .await
            .map_err(|e| {
                TranscribeError::UnsupportedInput(format!("staged audio unreadable: {}", e))
            })?;

        let mut last_failure = None;

        for candidate in &self.candidates {
            match self
                .attempt_provider(candidate, &data, source, request)
                .await
            {
                Ok(result) => return Ok(result),
                Err(failure @ ProviderFailure::UnsupportedAudio(_)) => {
                    // A rejected input will not improve on another backend.
                    return Err(terminal_error(failure));
                }
                Err(failure) => {
                    tracing::warn!(
                        provider = %candidate.id,
                        error = %failure,
                        "Provider exhausted, advancing to next candidate"
                    );
                    last_failure = Some(failure);
                }
            }
        }

        let failure = last_failure.unwrap_or_else(|| {
            ProviderFailure::Internal("candidate list yielded no attempts".to_string())
        });
        Err(terminal_error(failure))
    }

    async fn attempt_provider(
        &self,
        candidate: &ProviderCandidate,
        data: &[u8],
        source: &AudioSource,
        request: &TranscriptionRequest,
    ) -> Result<TranscriptionResult, ProviderFailure> {
        let mut attempt = 1u32;

        loop {
            let started = Instant::now();
            let outcome = match tokio::time::timeout(
                self.attempt_timeout,
                candidate.provider.attempt_transcribe(data, source, request),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(ProviderFailure::Transient(format!(
                    "attempt timed out after {}s",
                    self.attempt_timeout.as_secs()
                ))),
            };

            let record = ProviderAttempt::new(candidate.id, attempt, &outcome, started.elapsed());
            record.log();

            match outcome {
                Ok(transcript) => {
                    return Ok(TranscriptionResult {
                        text: transcript.text,
                        segments: transcript.segments,
                        language: transcript.language,
                        duration_secs: transcript.duration_secs,
                        provider: candidate.id,
                    });
                }
                Err(failure) if failure.is_transient() && attempt < self.max_attempts => {
                    let delay = backoff_delay(attempt);
                    tracing::debug!(
                        provider = %candidate.id,
                        attempt,
                        delay_secs = delay.as_secs(),
                        "Backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure),
            }
        }
    }
}

/// Attempt `n` waits `2 * n` seconds before attempt `n + 1`.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2 * u64::from(attempt))
}

fn terminal_error(failure: ProviderFailure) -> TranscribeError {
    match failure {
        ProviderFailure::Authentication(msg) => TranscribeError::Authentication(msg),
        ProviderFailure::QuotaExceeded(msg) => TranscribeError::QuotaExceeded(msg),
        ProviderFailure::Transient(msg) => TranscribeError::TransientNetwork(msg),
        ProviderFailure::UnsupportedAudio(msg) => TranscribeError::UnsupportedInput(msg),
        ProviderFailure::Internal(msg) => TranscribeError::TransientNetwork(msg),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptOutcome {
    Success,
    RetryableFailure,
    FatalFailure,
}

/// Record of one call to one provider. Lives only long enough to be logged
/// and to drive the retry decision.
struct ProviderAttempt {
    provider: ProviderId,
    attempt: u32,
    outcome: AttemptOutcome,
    elapsed: Duration,
}

impl ProviderAttempt {
    fn new<T>(
        provider: ProviderId,
        attempt: u32,
        outcome: &Result<T, ProviderFailure>,
        elapsed: Duration,
    ) -> Self {
        let outcome = match outcome {
            Ok(_) => AttemptOutcome::Success,
            Err(failure) if failure.is_transient() => AttemptOutcome::RetryableFailure,
            Err(_) => AttemptOutcome::FatalFailure,
        };
        Self {
            provider,
            attempt,
            outcome,
            elapsed,
        }
    }

    fn log(&self) {
        match self.outcome {
            AttemptOutcome::Success => tracing::info!(
                provider = %self.provider,
                attempt = self.attempt,
                elapsed_ms = self.elapsed.as_millis() as u64,
                "Transcription attempt succeeded"
            ),
            AttemptOutcome::RetryableFailure => tracing::warn!(
                provider = %self.provider,
                attempt = self.attempt,
                elapsed_ms = self.elapsed.as_millis() as u64,
                "Transcription attempt failed, retryable"
            ),
            AttemptOutcome::FatalFailure => tracing::warn!(
                provider = %self.provider,
                attempt = self.attempt,
                elapsed_ms = self.elapsed.as_millis() as u64,
                "Transcription attempt failed, fatal for this provider"
            ),
        }
    }
}
