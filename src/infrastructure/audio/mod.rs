pub mod audio_decoder;
mod candle_whisper_provider;
pub mod error_classification;
mod provider_factory;
mod whisper_api_provider;

pub use candle_whisper_provider::{CandleWhisperProvider, ModelLoadError};
pub use provider_factory::build_provider_candidates;
pub use whisper_api_provider::{GROQ_BASE_URL, OPENAI_BASE_URL, WhisperApiProvider};
