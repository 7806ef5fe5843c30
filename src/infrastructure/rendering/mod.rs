mod docx;
mod pdf;
mod subtitles;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ExportFormat;

pub use subtitles::CUE_SECONDS;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
    #[error("docx rendering failed: {0}")]
    Docx(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    title: &'a str,
    transcription: &'a str,
    exported_at: DateTime<Utc>,
}

/// Renders the transcript into the target format. Pure except for the
/// caller-supplied timestamp embedded in the JSON export; identical inputs
/// yield identical bytes.
pub fn render(
    format: ExportFormat,
    text: &str,
    title: &str,
    exported_at: DateTime<Utc>,
) -> Result<Vec<u8>, RenderError> {
    match format {
        ExportFormat::Txt => Ok(text.as_bytes().to_vec()),
        ExportFormat::Json => {
            let export = JsonExport {
                title,
                transcription: text,
                exported_at,
            };
            serde_json::to_vec_pretty(&export)
                .map_err(|e| RenderError::Serialization(e.to_string()))
        }
        ExportFormat::Srt => Ok(subtitles::render_srt(text)),
        ExportFormat::Vtt => Ok(subtitles::render_vtt(text)),
        ExportFormat::Pdf => pdf::render_pdf(text, title),
        ExportFormat::Docx => docx::render_docx(text),
    }
}
