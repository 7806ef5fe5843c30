use std::sync::Arc;

use crate::application::services::{RefinementService, TranscriptionService};
use crate::application::ports::AudioStagingStore;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub refinement_service: Arc<RefinementService>,
    pub staging_store: Arc<dyn AudioStagingStore>,
    pub settings: Settings,
}
