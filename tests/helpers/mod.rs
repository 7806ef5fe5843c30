#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;
use tokio::sync::Mutex;

use metagrafi::application::ports::{
    AudioStagingStore, ChatClient, ChatClientError, CompletionOptions, ProviderFailure,
    ProviderTranscript, TranscriptionProvider,
};
use metagrafi::domain::{AudioSource, ChatTurn, StoragePath, TranscriptionRequest};
use metagrafi::infrastructure::storage::LocalStagingStore;

pub fn transcript(text: &str) -> ProviderTranscript {
    ProviderTranscript {
        text: text.to_string(),
        segments: Vec::new(),
        language: Some("el".to_string()),
        duration_secs: Some(10.0),
    }
}

pub fn auth_failure() -> ProviderFailure {
    ProviderFailure::Authentication("status 401 Unauthorized: bad key".to_string())
}

pub fn quota_failure() -> ProviderFailure {
    ProviderFailure::QuotaExceeded("status 429: insufficient_quota".to_string())
}

pub fn transient_failure() -> ProviderFailure {
    ProviderFailure::Transient("connection reset by peer".to_string())
}

pub fn rejected_audio_failure() -> ProviderFailure {
    ProviderFailure::UnsupportedAudio("status 400: could not decode audio".to_string())
}

/// Provider that replays a fixed script of outcomes and counts calls.
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<ProviderTranscript, ProviderFailure>>>,
    calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn new(outcomes: Vec<Result<ProviderTranscript, ProviderFailure>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicU32::new(0),
        })
    }

    pub fn succeeding(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(transcript(text))])
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionProvider for ScriptedProvider {
    async fn attempt_transcribe(
        &self,
        _data: &[u8],
        _source: &AudioSource,
        _request: &TranscriptionRequest,
    ) -> Result<ProviderTranscript, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut outcomes = self.outcomes.lock().await;
        outcomes
            .pop_front()
            .unwrap_or_else(|| Err(ProviderFailure::Internal("script exhausted".to_string())))
    }
}

/// Provider that never answers within any sane attempt timeout.
pub struct SlowProvider {
    delay: Duration,
    calls: AtomicU32,
}

impl SlowProvider {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: AtomicU32::new(0),
        })
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionProvider for SlowProvider {
    async fn attempt_transcribe(
        &self,
        _data: &[u8],
        _source: &AudioSource,
        _request: &TranscriptionRequest,
    ) -> Result<ProviderTranscript, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(transcript("too late"))
    }
}

/// Chat client that records the turns it was given and replies verbatim.
pub struct RecordingChatClient {
    reply: String,
    turns: Mutex<Vec<ChatTurn>>,
}

impl RecordingChatClient {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            turns: Mutex::new(Vec::new()),
        })
    }

    pub async fn recorded_turns(&self) -> Vec<ChatTurn> {
        self.turns.lock().await.clone()
    }
}

#[async_trait]
impl ChatClient for RecordingChatClient {
    async fn complete(
        &self,
        turns: &[ChatTurn],
        _options: CompletionOptions,
    ) -> Result<String, ChatClientError> {
        *self.turns.lock().await = turns.to_vec();
        Ok(self.reply.clone())
    }
}

/// A staged upload backed by a throwaway directory.
pub struct StagedAudio {
    pub dir: TempDir,
    pub store: Arc<dyn AudioStagingStore>,
    pub source: AudioSource,
}

pub async fn stage_audio(filename: &str, mime_type: &str, data: &[u8]) -> StagedAudio {
    let dir = TempDir::new().expect("create temp dir");
    let store: Arc<dyn AudioStagingStore> =
        Arc::new(LocalStagingStore::new(dir.path().to_path_buf()).expect("create staging store"));

    let path = StoragePath::for_upload(filename);
    store
        .store(&path, Bytes::from(data.to_vec()))
        .await
        .expect("stage upload");

    let source = AudioSource::new(
        filename.to_string(),
        mime_type.to_string(),
        data.len() as u64,
        path,
    );

    StagedAudio { dir, store, source }
}

/// True when no regular files remain anywhere under `path`.
pub fn no_files_under(path: &Path) -> bool {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(_) => return true,
    };

    for entry in entries.flatten() {
        let entry_path = entry.path();
        if entry_path.is_dir() {
            if !no_files_under(&entry_path) {
                return false;
            }
        } else {
            return false;
        }
    }

    true
}
