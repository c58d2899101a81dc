use std::fs;
use std::io::ErrorKind;
use tracing::{debug, error, info, warn};

use crate::types::client_config::{ClientConfig, ConfigError};

pub fn load_config(path: &str) -> Result<ClientConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: ClientConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

/// Like [`load_config`], but a missing file yields the built-in defaults.
pub fn load_config_or_default(path: &str) -> Result<ClientConfig, ConfigError> {
    match load_config(path) {
        Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            warn!("No configuration at {}, using defaults", path);
            let config = ClientConfig::default();
            validate_config(&config)?;
            Ok(config)
        }
        other => other,
    }
}

pub fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::InvalidConfig("api.base_url cannot be empty".into()));
    }

    // The transport speaks plain HTTP/1.1; TLS is left to a local proxy.
    if !base_url.starts_with("http://") {
        return Err(ConfigError::InvalidConfig(
            "api.base_url must start with http://".into(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "api.timeout_secs must be greater than 0".into(),
        ));
    }

    if config.ui.tick_rate_ms == 0 {
        return Err(ConfigError::InvalidConfig(
            "ui.tick_rate_ms must be greater than 0".into(),
        ));
    }

    if config.ui.carousel_interval_ms == 0 {
        return Err(ConfigError::InvalidConfig(
            "ui.carousel_interval_ms must be greater than 0".into(),
        ));
    }

    Ok(())
}
