mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ChatSettings, LocalProviderSettings, LoggingSettings, RemoteProviderSettings, ServerSettings,
    Settings, StorageSettings, TranscriptionSettings,
};
