use std::sync::Arc;
use std::time::Duration;

use metagrafi::application::services::{
    ProviderCandidate, TranscribeError, TranscriptionService,
};
use metagrafi::domain::{ProviderId, TranscriptionRequest};

use crate::helpers::{
    ScriptedProvider, SlowProvider, auth_failure, no_files_under, quota_failure,
    rejected_audio_failure, stage_audio, transcript, transient_failure,
};

const MAX_ATTEMPTS: u32 = 3;
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(120);

fn service(
    candidates: Vec<ProviderCandidate>,
    staging: Arc<dyn metagrafi::application::ports::AudioStagingStore>,
) -> Arc<TranscriptionService> {
    Arc::new(TranscriptionService::new(
        candidates,
        staging,
        MAX_ATTEMPTS,
        ATTEMPT_TIMEOUT,
    ))
}

#[tokio::test]
async fn given_working_primary_when_transcribing_then_result_reports_primary() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;
    let primary = ScriptedProvider::succeeding("kalimera sas");

    let service = service(
        vec![ProviderCandidate::new(ProviderId::Primary, primary.clone())],
        staged.store.clone(),
    );

    let result = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect("transcription succeeds");

    assert_eq!(result.text, "kalimera sas");
    assert_eq!(result.provider, ProviderId::Primary);
    assert_eq!(primary.call_count(), 1);
}

#[tokio::test]
async fn given_successful_run_when_finished_then_staged_audio_is_removed() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;
    let primary = ScriptedProvider::succeeding("done");

    let service = service(
        vec![ProviderCandidate::new(ProviderId::Primary, primary)],
        staged.store.clone(),
    );

    service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect("transcription succeeds");

    assert!(no_files_under(staged.dir.path()));
}

#[tokio::test]
async fn given_primary_quota_error_when_transcribing_then_next_candidate_is_used() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;
    let primary = ScriptedProvider::new(vec![Err(quota_failure())]);
    let fallback = ScriptedProvider::succeeding("from the local model");

    let service = service(
        vec![
            ProviderCandidate::new(ProviderId::Primary, primary.clone()),
            ProviderCandidate::new(ProviderId::LocalFallback, fallback.clone()),
        ],
        staged.store.clone(),
    );

    let result = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect("fallback succeeds");

    assert_eq!(result.provider, ProviderId::LocalFallback);
    assert_eq!(primary.call_count(), 1, "quota must not be retried");
    assert_eq!(fallback.call_count(), 1);
}

#[tokio::test]
async fn given_invalid_primary_credentials_when_fallback_succeeds_then_no_auth_error_surfaces() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;
    let primary = ScriptedProvider::new(vec![Err(auth_failure())]);
    let fallback = ScriptedProvider::succeeding("recovered");

    let service = service(
        vec![
            ProviderCandidate::new(ProviderId::Primary, primary.clone()),
            ProviderCandidate::new(ProviderId::LocalFallback, fallback),
        ],
        staged.store.clone(),
    );

    let result = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect("fallback succeeds despite auth failure");

    assert_eq!(result.provider, ProviderId::LocalFallback);
    assert_eq!(primary.call_count(), 1, "auth failures must not be retried");
}

#[tokio::test(start_paused = true)]
async fn given_transient_failures_when_transcribing_then_same_provider_is_retried() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;
    let primary = ScriptedProvider::new(vec![
        Err(transient_failure()),
        Err(transient_failure()),
        Ok(transcript("third time lucky")),
    ]);

    let service = service(
        vec![ProviderCandidate::new(ProviderId::Primary, primary.clone())],
        staged.store.clone(),
    );

    let result = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect("retry succeeds");

    assert_eq!(result.text, "third time lucky");
    assert_eq!(result.provider, ProviderId::Primary);
    assert_eq!(primary.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn given_transient_failures_when_retrying_then_backoff_doubles_per_attempt() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;
    let primary = ScriptedProvider::new(vec![
        Err(transient_failure()),
        Err(transient_failure()),
        Ok(transcript("ok")),
    ]);

    let service = service(
        vec![ProviderCandidate::new(ProviderId::Primary, primary)],
        staged.store.clone(),
    );

    let started = tokio::time::Instant::now();
    service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect("retry succeeds");
    let elapsed = started.elapsed();

    // 2s after attempt 1 plus 4s after attempt 2.
    assert!(elapsed >= Duration::from_secs(6), "elapsed: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(7), "elapsed: {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn given_transient_exhaustion_when_fallback_exists_then_it_is_attempted() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;
    let primary = ScriptedProvider::new(vec![
        Err(transient_failure()),
        Err(transient_failure()),
        Err(transient_failure()),
    ]);
    let fallback = ScriptedProvider::succeeding("fallback text");

    let service = service(
        vec![
            ProviderCandidate::new(ProviderId::Primary, primary.clone()),
            ProviderCandidate::new(ProviderId::LocalFallback, fallback.clone()),
        ],
        staged.store.clone(),
    );

    let result = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect("fallback succeeds");

    assert_eq!(primary.call_count(), 3, "attempts capped at the maximum");
    assert_eq!(fallback.call_count(), 1);
    assert_eq!(result.provider, ProviderId::LocalFallback);
}

#[tokio::test(start_paused = true)]
async fn given_every_provider_exhausted_when_transcribing_then_error_is_transient_and_file_removed()
{
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;
    let only = ScriptedProvider::new(vec![
        Err(transient_failure()),
        Err(transient_failure()),
        Err(transient_failure()),
    ]);

    let service = service(
        vec![ProviderCandidate::new(ProviderId::Primary, only.clone())],
        staged.store.clone(),
    );

    let error = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect_err("no provider left");

    assert!(matches!(error, TranscribeError::TransientNetwork(_)));
    assert_eq!(only.call_count(), 3);
    assert!(no_files_under(staged.dir.path()));
}

#[tokio::test]
async fn given_no_candidates_when_transcribing_then_provider_unavailable_and_file_removed() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;

    let service = service(Vec::new(), staged.store.clone());

    let error = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect_err("nothing configured");

    assert!(matches!(error, TranscribeError::ProviderUnavailable));
    assert!(no_files_under(staged.dir.path()));
}

#[tokio::test]
async fn given_rejected_audio_when_transcribing_then_no_fallback_is_attempted() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"not really audio").await;
    let primary = ScriptedProvider::new(vec![Err(rejected_audio_failure())]);
    let fallback = ScriptedProvider::succeeding("should not run");

    let service = service(
        vec![
            ProviderCandidate::new(ProviderId::Primary, primary),
            ProviderCandidate::new(ProviderId::LocalFallback, fallback.clone()),
        ],
        staged.store.clone(),
    );

    let error = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect_err("input errors are terminal");

    assert!(matches!(error, TranscribeError::UnsupportedInput(_)));
    assert_eq!(fallback.call_count(), 0);
    assert!(no_files_under(staged.dir.path()));
}

#[tokio::test]
async fn given_missing_staged_file_when_transcribing_then_unsupported_input() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"bytes").await;
    staged
        .store
        .delete(staged.source.storage_path())
        .await
        .expect("delete staged file");

    let primary = ScriptedProvider::succeeding("unreachable");
    let service = service(
        vec![ProviderCandidate::new(ProviderId::Primary, primary.clone())],
        staged.store.clone(),
    );

    let error = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect_err("nothing to read");

    assert!(matches!(error, TranscribeError::UnsupportedInput(_)));
    assert_eq!(primary.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn given_hanging_provider_when_attempt_times_out_then_classified_transient_and_retried() {
    let staged = stage_audio("meeting.wav", "audio/wav", b"fake wav bytes").await;
    let hanging = SlowProvider::new(Duration::from_secs(3600));

    let service = Arc::new(TranscriptionService::new(
        vec![ProviderCandidate::new(ProviderId::Primary, hanging.clone())],
        staged.store.clone(),
        2,
        Duration::from_secs(5),
    ));

    let error = service
        .transcribe(staged.source.clone(), TranscriptionRequest::default())
        .await
        .expect_err("provider never answers");

    assert!(matches!(error, TranscribeError::TransientNetwork(_)));
    assert_eq!(hanging.call_count(), 2, "timeouts follow the retry policy");
    assert!(no_files_under(staged.dir.path()));
}
