//! Observation types and error definitions.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One directional travel-time sample, exactly as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub origin: String,
    pub destination: String,
    pub duration_seconds: u32,
    /// Absent when the routing API reported no distance.
    pub distance_meters: Option<u32>,
    pub observed_at: DateTime<Utc>,
}

/// Render a timestamp the way the store persists it.
///
/// Second precision with an explicit `+00:00` offset, so string order in the
/// table matches time order.
pub fn format_observed_at(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parse a persisted `observed_at` value back into UTC.
pub fn parse_observed_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// Errors raised by the observation store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database directory could not be created.
    #[error("cannot prepare store directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A read-only open found no database file.
    #[error("no observation store at {0}")]
    Missing(PathBuf),

    /// SQLite rejected an operation.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored timestamp could not be parsed.
    #[error("invalid observed_at value in store: '{0}'")]
    InvalidTimestamp(String),

    /// The blocking task running the store operation panicked or was cancelled.
    #[error("store worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_observed_at() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_observed_at(&at), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_observed_at_normalizes_offset() {
        let parsed = parse_observed_at("2024-06-01T05:30:00-07:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap());
        assert!(parse_observed_at("yesterday").is_none());
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::InvalidTimestamp("nope".to_string());
        assert_eq!(err.to_string(), "invalid observed_at value in store: 'nope'");
    }
}
