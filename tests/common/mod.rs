//! Shared utilities for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;

use drive_times::config::ApiConfig;
use drive_times::{DistanceMatrixClient, Observation, ObservationStore};

/// Distance-matrix body with one OK element per `(duration, distance)` pair.
pub fn matrix_body(elements: &[(u32, u32)]) -> Value {
    let elements: Vec<Value> = elements
        .iter()
        .map(|(duration, distance)| {
            json!({
                "status": "OK",
                "duration": { "value": duration, "text": "" },
                "distance": { "value": distance, "text": "" },
            })
        })
        .collect();
    json!({
        "status": "OK",
        "rows": [{ "elements": elements }],
    })
}

/// Distance-matrix body with a non-OK top-level status.
pub fn status_body(status: &str) -> Value {
    json!({ "status": status, "error_message": "test failure", "rows": [] })
}

/// Client pointed at a mock server.
pub fn client_for(base_url: &str) -> DistanceMatrixClient {
    let config = ApiConfig {
        key: "test-key".to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    DistanceMatrixClient::new(&config).unwrap()
}

/// Temp directory plus the store path inside it.
pub fn temp_store() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("travel_times.sqlite");
    (dir, path)
}

pub fn row(origin: &str, destination: &str, duration_seconds: u32, at: DateTime<Utc>) -> Observation {
    Observation {
        origin: origin.to_string(),
        destination: destination.to_string(),
        duration_seconds,
        distance_meters: None,
        observed_at: at,
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn store_rows(path: &std::path::Path) -> Vec<Observation> {
    ObservationStore::open_ready(path).unwrap().observations().unwrap()
}
