//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the sampler
//! and its reporting side. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Routing API access.
    pub api: ApiConfig,

    /// Observation store location.
    pub store: StoreConfig,

    /// Origin, destinations and cadence.
    pub sampling: SamplingConfig,

    /// Read-side settings (query API, exporter).
    pub reporting: ReportingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Routing API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key sent with every request. Required for sampling.
    pub key: String,

    /// Distance-matrix endpoint.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: "https://maps.googleapis.com/maps/api/distancematrix/json".to_string(),
            timeout_secs: 15,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("key", &if self.key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Observation store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "./data/travel_times.sqlite".to_string(),
        }
    }
}

/// Sampling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Fixed origin for forward samples.
    pub origin: String,

    /// Ordered destination list.
    pub destinations: Vec<String>,

    /// Pause between sampling rounds in seconds.
    pub interval_secs: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            origin: "Golden, CO".to_string(),
            destinations: vec!["Frisco, CO".to_string(), "Winter Park, CO".to_string()],
            interval_secs: 3600,
        }
    }
}

/// Reporting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Fixed UTC offset used to bucket observations into calendar days
    /// (e.g., "-07:00").
    pub utc_offset: String,

    /// Query API bind address.
    pub bind_address: String,

    /// Per-request timeout for the query API in seconds.
    pub request_timeout_secs: u64,

    /// Output directory for the static exporter.
    pub export_dir: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            utc_offset: "-07:00".to_string(),
            bind_address: "127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
            export_dir: "static_site".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.sampling.origin, "Golden, CO");
        assert_eq!(config.sampling.destinations.len(), 2);
        assert_eq!(config.sampling.interval_secs, 3600);
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.reporting.utc_offset, "-07:00");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [sampling]
            destinations = ["Vail, CO"]

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.sampling.destinations, vec!["Vail, CO".to_string()]);
        assert_eq!(config.sampling.origin, "Golden, CO");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.store.path, "./data/travel_times.sqlite");
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let mut config = ApiConfig::default();
        config.key = "super-secret".to_string();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
