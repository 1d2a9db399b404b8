//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0)
//! - Check that addresses, URLs and offsets parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - The API key is only checked for sampling; read-side commands run without it

use std::net::SocketAddr;

use chrono::FixedOffset;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.key is required for sampling")]
    MissingApiKey,

    #[error("api.base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("sampling.origin must not be empty")]
    EmptyOrigin,

    #[error("sampling.destinations must list at least one destination")]
    NoDestinations,

    #[error("sampling.destinations[{0}] is blank")]
    BlankDestination(usize),

    #[error("reporting.utc_offset '{0}' is not a valid offset like -07:00")]
    InvalidOffset(String),

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check everything that every command relies on.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.api.base_url).is_err() {
        errors.push(ValidationError::InvalidBaseUrl(config.api.base_url.clone()));
    }
    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration { field: "api.timeout_secs" });
    }

    if config.sampling.origin.trim().is_empty() {
        errors.push(ValidationError::EmptyOrigin);
    }
    if config.sampling.destinations.is_empty() {
        errors.push(ValidationError::NoDestinations);
    }
    for (i, destination) in config.sampling.destinations.iter().enumerate() {
        if destination.trim().is_empty() {
            errors.push(ValidationError::BlankDestination(i));
        }
    }
    if config.sampling.interval_secs == 0 {
        errors.push(ValidationError::ZeroDuration { field: "sampling.interval_secs" });
    }

    if parse_utc_offset(&config.reporting.utc_offset).is_none() {
        errors.push(ValidationError::InvalidOffset(config.reporting.utc_offset.clone()));
    }
    if config.reporting.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration {
            field: "reporting.request_timeout_secs",
        });
    }
    if config.reporting.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "reporting.bind_address",
            value: config.reporting.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Extra checks for the sampler, which talks to the routing API.
pub fn validate_for_sampling(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = match validate_config(config) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };
    if config.api.key.trim().is_empty() {
        errors.insert(0, ValidationError::MissingApiKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse an offset such as `-07:00`, `+05:30` or `Z`.
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
