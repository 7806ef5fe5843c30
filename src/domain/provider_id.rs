use std::fmt;

use serde::Serialize;

/// Position of a transcription backend in the configured candidate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderId {
    Primary,
    Alternate,
    LocalFallback,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Primary => "primary",
            ProviderId::Alternate => "alternate",
            ProviderId::LocalFallback => "local-fallback",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
