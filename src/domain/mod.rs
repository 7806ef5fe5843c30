mod audio_source;
mod chat_turn;
mod export_format;
mod provider_id;
mod storage_path;
mod transcription;

pub use audio_source::{AudioSource, SUPPORTED_EXTENSIONS, is_supported_audio};
pub use chat_turn::{ChatRole, ChatTurn};
pub use export_format::ExportFormat;
pub use provider_id::ProviderId;
pub use storage_path::StoragePath;
pub use transcription::{
    DEFAULT_LANGUAGE, ResponseVerbosity, TranscriptSegment, TranscriptionRequest,
    TranscriptionResult,
};
