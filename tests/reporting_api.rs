//! Query API behaviour over a populated store.

mod common;

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::FixedOffset;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{row, temp_store, utc};
use drive_times::reporting::{router, ReportState};
use drive_times::ObservationStore;

fn mountain() -> FixedOffset {
    FixedOffset::west_opt(7 * 3600).unwrap()
}

/// Store with a handful of Golden ↔ Frisco rows around 2024-03-10 local.
fn populated() -> (tempfile::TempDir, Router) {
    let (dir, db) = temp_store();
    let mut store = ObservationStore::open_ready(&db).unwrap();
    store
        .append(&[
            row("Golden, CO", "Frisco, CO", 3600, utc(2024, 3, 10, 15)),
            row("Frisco, CO", "Golden, CO", 3650, utc(2024, 3, 10, 15)),
            row("Golden, CO", "Frisco, CO", 4000, utc(2024, 3, 10, 20)),
            // 19:00 local on the 10th
            row("Golden, CO", "Frisco, CO", 4500, utc(2024, 3, 11, 2)),
            row("Golden, CO", "Frisco, CO", 3000, utc(2024, 3, 11, 8)),
            // 17:00 local on Dec 31st 2023
            row("Golden, CO", "Frisco, CO", 3900, utc(2024, 1, 1, 0)),
        ])
        .unwrap();
    store.close().unwrap();

    let state = ReportState {
        db_path: db,
        offset: mountain(),
    };
    (dir, router(state, Duration::from_secs(5)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_destinations_lists_both_directions() {
    let (_dir, app) = populated();
    let (status, body) = get(app, "/api/destinations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "destinations": ["Frisco, CO", "Golden, CO"] }));
}

#[tokio::test]
async fn test_years_use_display_offset() {
    let (_dir, app) = populated();
    let (status, body) = get(app, "/api/years").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "years": [2023, 2024] }));
}

#[tokio::test]
async fn test_calendar_reports_daily_maximum() {
    let (_dir, app) = populated();
    let (status, body) = get(app, "/api/calendar?destination=Frisco,%20CO&year=2024").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"], "Frisco, CO");
    assert_eq!(body["year"], 2024);
    assert_eq!(
        body["data"],
        json!({ "2024-03-10": 4500, "2024-03-11": 3000 })
    );
}

#[tokio::test]
async fn test_day_returns_local_series_in_order() {
    let (_dir, app) = populated();
    let (status, body) = get(app, "/api/day?destination=Frisco,%20CO&date=2024-03-10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2024-03-10");
    assert_eq!(
        body["data"],
        json!([
            { "observed_at": "2024-03-10T08:00:00-07:00", "origin": "Golden, CO", "duration_seconds": 3600 },
            { "observed_at": "2024-03-10T13:00:00-07:00", "origin": "Golden, CO", "duration_seconds": 4000 },
            { "observed_at": "2024-03-10T19:00:00-07:00", "origin": "Golden, CO", "duration_seconds": 4500 },
        ])
    );
}

#[tokio::test]
async fn test_unknown_destination_is_empty_not_error() {
    let (_dir, app) = populated();
    let (status, body) = get(app, "/api/day?destination=Nowhere&date=2024-03-10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_missing_or_invalid_params_are_bad_requests() {
    let (_dir, app) = populated();

    for uri in [
        "/api/calendar?destination=Frisco,%20CO&year=2147483647",
        "/api/calendar?destination=Frisco,%20CO&year=-2147483648",
        "/api/calendar?destination=Frisco,%20CO",
        "/api/calendar?year=2024",
        "/api/calendar?destination=Frisco,%20CO&year=twenty",
        "/api/day?destination=Frisco,%20CO",
        "/api/day?destination=&date=2024-03-10",
        "/api/day?destination=Frisco,%20CO&date=03/10/2024",
    ] {
        let (status, body) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn test_largest_year_is_rejected_without_panic() {
    let (_dir, app) = populated();
    let (status, body) = get(app, "/api/calendar?destination=Frisco&year=2147483647").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid year '2147483647'" }));
}

#[tokio::test]
async fn test_missing_store_is_not_created_by_reads() {
    let (dir, _) = temp_store();
    let db = dir.path().join("typo").join("travel_times.sqlite");
    let app = router(
        ReportState {
            db_path: db.clone(),
            offset: mountain(),
        },
        Duration::from_secs(5),
    );

    let (status, body) = get(app, "/api/destinations").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert!(!db.exists());
    assert!(!dir.path().join("typo").exists());
}
