use serde::{Deserialize, Serialize};

use super::provider_id::ProviderId;

pub const DEFAULT_LANGUAGE: &str = "el";

/// How much detail the caller wants back from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseVerbosity {
    /// Transcript text only.
    Minimal,
    /// Text plus timed segments, detected language and duration.
    #[default]
    Timed,
}

/// Options for one transcription run. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    language: String,
    prompt: Option<String>,
    verbosity: ResponseVerbosity,
}

impl TranscriptionRequest {
    pub fn new(
        language: Option<String>,
        prompt: Option<String>,
        verbosity: ResponseVerbosity,
    ) -> Self {
        let language = language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        Self {
            language,
            prompt: prompt.filter(|p| !p.trim().is_empty()),
            verbosity,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn verbosity(&self) -> ResponseVerbosity {
        self.verbosity
    }
}

impl Default for TranscriptionRequest {
    fn default() -> Self {
        Self::new(None, None, ResponseVerbosity::default())
    }
}

/// A time-bounded slice of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Outcome of a transcription run. Produced exactly once per request.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    pub language: Option<String>,
    pub duration_secs: Option<f64>,
    pub provider: ProviderId,
}
