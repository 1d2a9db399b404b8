//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub const ENV_API_KEY: &str = "DRIVE_TIMES_API_KEY";
pub const ENV_DB: &str = "DRIVE_TIMES_DB";
pub const ENV_ORIGIN: &str = "DRIVE_TIMES_ORIGIN";
pub const ENV_DESTINATIONS: &str = "DRIVE_TIMES_DESTINATIONS";
pub const ENV_INTERVAL: &str = "DRIVE_TIMES_INTERVAL_SECONDS";
pub const ENV_UTC_OFFSET: &str = "DRIVE_TIMES_UTC_OFFSET";
pub const ENV_LOG_LEVEL: &str = "DRIVE_TIMES_LOG_LEVEL";

/// Load configuration from an optional TOML file, apply process environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment settings on top of `config`.
///
/// `lookup` abstracts the environment so overrides can be exercised without
/// touching process state.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY) {
        config.api.key = key.trim().to_string();
    }
    if let Some(path) = lookup(ENV_DB) {
        config.store.path = path;
    }
    if let Some(origin) = lookup(ENV_ORIGIN) {
        config.sampling.origin = origin.trim().to_string();
    }
    if let Some(destinations) = lookup(ENV_DESTINATIONS) {
        config.sampling.destinations = split_destinations(&destinations);
    }
    if let Some(interval) = lookup(ENV_INTERVAL) {
        config.sampling.interval_secs =
            interval.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
                var: ENV_INTERVAL,
                message: e.to_string(),
            })?;
    }
    if let Some(offset) = lookup(ENV_UTC_OFFSET) {
        config.reporting.utc_offset = offset.trim().to_string();
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = level.trim().to_string();
    }
    Ok(())
}

/// Split a `;`-separated destination list, dropping blank entries.
pub fn split_destinations(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
