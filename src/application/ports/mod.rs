mod chat_client;
mod staging_store;
mod transcription_provider;

pub use chat_client::{ChatClient, ChatClientError, CompletionOptions};
pub use staging_store::{AudioStagingStore, StagingStoreError};
pub use transcription_provider::{ProviderFailure, ProviderTranscript, TranscriptionProvider};
