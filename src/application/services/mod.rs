mod refinement_service;
mod transcription_service;

pub use refinement_service::{MAX_HISTORY_TURNS, RefinementError, RefinementService};
pub use transcription_service::{ProviderCandidate, TranscribeError, TranscriptionService};
