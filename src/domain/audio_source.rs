use super::storage_path::StoragePath;

/// Filename extensions accepted at the upload boundary.
pub const SUPPORTED_EXTENSIONS: [&str; 9] = [
    "mp3", "wav", "m4a", "flac", "ogg", "webm", "amr", "3gp", "aac",
];

const SUPPORTED_MIME_TYPES: [&str; 15] = [
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/wave",
    "audio/x-wav",
    "audio/mp4",
    "audio/m4a",
    "audio/x-m4a",
    "audio/flac",
    "audio/ogg",
    "audio/webm",
    "audio/amr",
    "audio/3gpp",
    "audio/aac",
    "audio/x-aac",
];

/// An uploaded audio file staged for exactly one transcription request.
///
/// The staged bytes live only as long as the request: the orchestrator
/// removes them on every exit path.
#[derive(Debug, Clone)]
pub struct AudioSource {
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    storage_path: StoragePath,
}

impl AudioSource {
    pub fn new(
        filename: String,
        mime_type: String,
        size_bytes: u64,
        storage_path: StoragePath,
    ) -> Self {
        Self {
            filename,
            mime_type,
            size_bytes,
            storage_path,
        }
    }

    pub fn storage_path(&self) -> &StoragePath {
        &self.storage_path
    }
}

/// Accepts a file when either its declared MIME type or its filename
/// extension is a recognized audio format.
pub fn is_supported_audio(filename: &str, mime_type: &str) -> bool {
    if SUPPORTED_MIME_TYPES.contains(&mime_type.to_ascii_lowercase().as_str()) {
        return true;
    }

    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
