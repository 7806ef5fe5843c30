use config::{Config, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub transcription: TranscriptionSettings,
    pub chat: ChatSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layered load: optional `appsettings.{environment}.toml` under
    /// `APP`-prefixed environment variables (`APP_CHAT__API_KEY`, ...).
    pub fn load(environment: Environment) -> Result<Self, config::ConfigError> {
        let configuration = Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str()))
                    .required(false),
            )
            .add_source(EnvironmentSource::with_prefix("APP").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upload ceiling; deployment-dependent (small on constrained hosting).
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_mb: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub staging_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            staging_dir: "uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub max_attempts: u32,
    pub attempt_timeout_secs: u64,
    pub openai: RemoteProviderSettings,
    pub groq: RemoteProviderSettings,
    pub local: LocalProviderSettings,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout_secs: 120,
            openai: RemoteProviderSettings::default(),
            groq: RemoteProviderSettings::default(),
            local: LocalProviderSettings::default(),
        }
    }
}

/// Per-backend model defaults are resolved where the candidate is built;
/// an absent `model` here means "use that backend's default".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RemoteProviderSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalProviderSettings {
    pub enabled: bool,
    pub model: String,
}

impl Default for LocalProviderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "openai/whisper-base".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-4-turbo-preview".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}
