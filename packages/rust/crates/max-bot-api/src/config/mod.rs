//! Client configuration: defaults, environment variables, YAML settings.
//!
//! Resolution order per field is env var, then settings file, then default.
//! Invalid env or settings values are logged and skipped.

mod settings;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use max_bot_schemes::UpdateType;
use reqwest::Url;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_API_VERSION, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_POLL_LIMIT,
    DEFAULT_POLL_PAUSE_MS, DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_UPDATES_CAPACITY,
};
use crate::error::ConfigError;
use crate::polling::PollingOptions;

pub use settings::{BotSettings, PollingSettings, WebhookSettings};

pub const ENV_TOKEN: &str = "MAX_BOT_TOKEN";
pub const ENV_API_URL: &str = "MAX_BOT_API_URL";
pub const ENV_API_VERSION: &str = "MAX_BOT_API_VERSION";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "MAX_BOT_HTTP_TIMEOUT_SECS";
pub const ENV_POLL_TIMEOUT_SECS: &str = "MAX_BOT_POLL_TIMEOUT_SECS";
pub const ENV_POLL_PAUSE_MS: &str = "MAX_BOT_POLL_PAUSE_MS";
pub const ENV_POLL_LIMIT: &str = "MAX_BOT_POLL_LIMIT";
pub const ENV_UPDATE_TYPES: &str = "MAX_BOT_UPDATE_TYPES";
pub const ENV_UPDATES_CAPACITY: &str = "MAX_BOT_UPDATES_CAPACITY";

/// Everything needed to talk to the bot API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub token: String,
    pub api_url: String,
    pub api_version: String,
    /// Timeout of ordinary requests; long polls use their own window.
    pub http_timeout: Duration,
    pub polling: PollingOptions,
}

impl ClientConfig {
    /// Defaults for everything except the token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            polling: PollingOptions::default(),
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Resolves from the process environment only.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the resolved token or URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), None)
    }

    /// Resolves from the process environment over `settings`.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the resolved token or URL is invalid.
    pub fn from_env_with_settings(settings: &BotSettings) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), Some(settings))
    }

    /// Resolves through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the resolved token or URL is invalid.
    #[doc(hidden)]
    pub fn from_lookup<F>(lookup: F, settings: Option<&BotSettings>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let polling_settings = settings.map(|s| &s.polling);
        let config = Self {
            token: resolve_string(
                &lookup,
                ENV_TOKEN,
                settings.and_then(|s| s.token.clone()),
                "",
            ),
            api_url: resolve_string(
                &lookup,
                ENV_API_URL,
                settings.and_then(|s| s.api_url.clone()),
                DEFAULT_API_URL,
            ),
            api_version: resolve_string(
                &lookup,
                ENV_API_VERSION,
                settings.and_then(|s| s.api_version.clone()),
                DEFAULT_API_VERSION,
            ),
            http_timeout: Duration::from_secs(resolve_positive(
                &lookup,
                ENV_HTTP_TIMEOUT_SECS,
                settings.and_then(|s| s.http_timeout_secs),
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
            polling: PollingOptions {
                long_poll_timeout: Duration::from_secs(resolve_positive(
                    &lookup,
                    ENV_POLL_TIMEOUT_SECS,
                    polling_settings.and_then(|s| s.timeout_secs),
                    DEFAULT_POLL_TIMEOUT_SECS,
                )),
                pause: Duration::from_millis(resolve_positive(
                    &lookup,
                    ENV_POLL_PAUSE_MS,
                    polling_settings.and_then(|s| s.pause_ms),
                    DEFAULT_POLL_PAUSE_MS,
                )),
                limit: u32::try_from(resolve_positive(
                    &lookup,
                    ENV_POLL_LIMIT,
                    polling_settings.and_then(|s| s.limit),
                    u64::from(DEFAULT_POLL_LIMIT),
                ))
                .unwrap_or(u32::MAX),
                types: resolve_update_types(
                    &lookup,
                    ENV_UPDATE_TYPES,
                    polling_settings.and_then(|s| s.update_types.clone()),
                ),
                capacity: resolve_positive(
                    &lookup,
                    ENV_UPDATES_CAPACITY,
                    polling_settings.and_then(|s| s.capacity),
                    DEFAULT_UPDATES_CAPACITY,
                ),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the token and URL.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyToken`] or [`ConfigError::InvalidUrl`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        self.base_url().map(|_| ())
    }

    /// Parsed base URL, always ending with `/` so relative paths append.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidUrl`] when the URL is not absolute http(s).
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_url.trim();
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };
        let mut url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

fn resolve_string<F>(lookup: &F, name: &str, setting_value: Option<String>, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            setting_value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
        .unwrap_or_else(|| default.to_string())
}

/// Positive numeric setting: env first, then settings, then `default`.
/// Unparsable or zero values are skipped with a warning.
fn resolve_positive<T, F>(lookup: &F, name: &str, setting_value: Option<T>, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Copy + fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let is_positive = |value: &T| *value > T::default();
    let from_env = lookup(name).and_then(|raw| {
        let parsed = raw.trim().parse::<T>().ok().filter(is_positive);
        if parsed.is_none() {
            tracing::warn!(
                env_var = %name,
                value = %raw,
                "ignoring MAX env override; expected a positive number"
            );
        }
        parsed
    });
    from_env
        .or_else(|| {
            setting_value.filter(|value| {
                let keep = is_positive(value);
                if !keep {
                    tracing::warn!(
                        setting = %name,
                        value = %value,
                        default = %default,
                        "ignoring non-positive MAX setting"
                    );
                }
                keep
            })
        })
        .unwrap_or(default)
}

/// Env value is a comma-separated list. Unknown names are dropped with a
/// warning; an env value with no valid name falls through to settings.
fn resolve_update_types<F>(
    lookup: &F,
    name: &str,
    setting_value: Option<Vec<String>>,
) -> Vec<UpdateType>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        let parsed = parse_update_types(raw.split(','), name);
        if !parsed.is_empty() {
            return parsed;
        }
        if !raw.trim().is_empty() {
            tracing::warn!(
                env_var = %name,
                value = %raw,
                "no valid update types in env value; using settings/default"
            );
        }
    }
    setting_value
        .map(|values| parse_update_types(values.iter().map(String::as_str), name))
        .unwrap_or_default()
}

fn parse_update_types<'a>(values: impl Iterator<Item = &'a str>, name: &str) -> Vec<UpdateType> {
    let mut types = Vec::new();
    for value in values.map(str::trim).filter(|value| !value.is_empty()) {
        match value.parse::<UpdateType>() {
            Ok(kind) if !types.contains(&kind) => types.push(kind),
            Ok(_) => {}
            Err(error) => tracing::warn!(source = %name, error = %error, "ignoring update type"),
        }
    }
    types
}
