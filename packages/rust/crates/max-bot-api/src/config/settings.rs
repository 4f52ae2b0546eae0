use std::path::Path;

use serde::Deserialize;

/// Optional YAML settings file. Every field may be omitted; environment
/// variables take precedence over anything set here.
///
/// ```yaml
/// token: "..."
/// api_url: "https://platform-api.max.ru/"
/// http_timeout_secs: 30
/// polling:
///   timeout_secs: 30
///   pause_ms: 1000
///   limit: 50
///   update_types: [message_created, bot_started]
///   capacity: 8
/// webhook:
///   bind: "0.0.0.0:8080"
///   path: "/max/webhook"
///   secret: "..."
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub api_version: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub polling: PollingSettings,
    pub webhook: WebhookSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub timeout_secs: Option<u64>,
    pub pause_ms: Option<u64>,
    pub limit: Option<u64>,
    pub update_types: Option<Vec<String>>,
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub bind: Option<String>,
    pub path: Option<String>,
    pub secret: Option<String>,
}

impl BotSettings {
    /// Reads a settings file, falling back to empty settings when the file is
    /// missing, unreadable or not valid YAML.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "settings file not found; using defaults");
            return Self::default();
        }
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to read settings file; ignoring"
                );
                return Self::default();
            }
        };
        match serde_yaml::from_str::<Self>(&raw) {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to parse settings yaml; ignoring file"
                );
                Self::default()
            }
        }
    }
}
