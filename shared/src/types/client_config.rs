use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "EDUHUB_API_URL";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Where the credential is persisted. Defaults to `~/.eduhub/session.json`.
    #[serde(default)]
    pub store_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// Delay between a successful registration and the jump to `/login`.
    #[serde(default = "default_register_redirect_ms")]
    pub register_redirect_ms: u64,
    /// How long a submission success message stays on screen.
    #[serde(default = "default_success_flash_ms")]
    pub success_flash_ms: u64,
    /// Landing page feature rotation period.
    #[serde(default = "default_carousel_interval_ms")]
    pub carousel_interval_ms: u64,
    /// Redraw tick for the terminal front-end.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ApiConfig {
    /// Resolve the base URL with `EDUHUB_API_URL` taking priority over the
    /// config file field.
    pub fn resolved_base_url(&self) -> String {
        self.base_url_with_override(std::env::var(API_URL_ENV).ok())
    }

    /// Base URL with an explicit override applied, trailing `/` removed.
    pub fn base_url_with_override(&self, over: Option<String>) -> String {
        over.filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.base_url.clone())
            .trim()
            .trim_end_matches('/')
            .to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SessionConfig {
    pub fn resolved_store_path(&self) -> PathBuf {
        match &self.store_path {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".eduhub")
                .join("session.json"),
        }
    }
}

impl UiConfig {
    pub fn register_redirect(&self) -> Duration {
        Duration::from_millis(self.register_redirect_ms)
    }

    pub fn success_flash(&self) -> Duration {
        Duration::from_millis(self.success_flash_ms)
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_millis(self.carousel_interval_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            register_redirect_ms: default_register_redirect_ms(),
            success_flash_ms: default_success_flash_ms(),
            carousel_interval_ms: default_carousel_interval_ms(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_register_redirect_ms() -> u64 {
    2000
}

pub fn default_success_flash_ms() -> u64 {
    3000
}

pub fn default_carousel_interval_ms() -> u64 {
    4000
}

pub fn default_tick_rate_ms() -> u64 {
    250
}
