//! HTTP query API.
//!
//! # Responsibilities
//! - Serve destinations, years, calendar and day queries as JSON
//! - Validate query parameters (400 on missing/invalid input)
//! - Open one read-only store connection per request, off the async executor

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{parse_utc_offset, AppConfig};
use crate::lifecycle::signals::shutdown_signal;
use crate::store::{with_read_store, DayEntry, StoreError};

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub db_path: PathBuf,
    pub offset: FixedOffset,
}

impl ReportState {
    /// Build state from validated configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let offset = parse_utc_offset(&config.reporting.utc_offset).ok_or_else(|| {
            ApiError::BadRequest(format!("invalid utc_offset '{}'", config.reporting.utc_offset))
        })?;
        Ok(Self {
            db_path: PathBuf::from(&config.store.path),
            offset,
        })
    }
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "Query failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    destination: Option<String>,
    year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DayParams {
    destination: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub destination: String,
    pub year: i32,
    pub data: std::collections::BTreeMap<String, u32>,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub destination: String,
    pub date: String,
    pub data: Vec<DayEntry>,
}

/// Build the query router.
#[allow(deprecated)]
pub fn router(state: ReportState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/destinations", get(destinations))
        .route("/api/years", get(years))
        .route("/api/calendar", get(calendar))
        .route("/api/day", get(day))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until SIGINT/SIGTERM.
pub async fn serve(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = ReportState::from_config(config)?;
    let addr: SocketAddr = config.reporting.bind_address.parse()?;
    let app = router(state, Duration::from_secs(config.reporting.request_timeout_secs));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Query API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Query API stopped");
    Ok(())
}

async fn destinations(State(state): State<ReportState>) -> Result<Json<serde_json::Value>, ApiError> {
    let destinations = with_read_store(state.db_path, |store| store.destinations()).await?;
    Ok(Json(json!({ "destinations": destinations })))
}

async fn years(State(state): State<ReportState>) -> Result<Json<serde_json::Value>, ApiError> {
    let offset = state.offset;
    let years = with_read_store(state.db_path, move |store| store.years(offset)).await?;
    Ok(Json(json!({ "years": years })))
}

async fn calendar(
    State(state): State<ReportState>,
    Query(params): Query<CalendarParams>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let (Some(destination), Some(year)) = (non_blank(params.destination), non_blank(params.year)) else {
        return Err(ApiError::BadRequest("destination and year are required".to_string()));
    };
    let year = year
        .parse::<i32>()
        .ok()
        .filter(|y| (NaiveDate::MIN.year()..NaiveDate::MAX.year()).contains(y))
        .ok_or_else(|| ApiError::BadRequest(format!("invalid year '{year}'")))?;

    let offset = state.offset;
    let dest = destination.clone();
    let days = with_read_store(state.db_path, move |store| store.calendar(&dest, year, offset)).await?;

    Ok(Json(CalendarResponse {
        destination,
        year,
        data: days.into_iter().map(|(day, max)| (day.to_string(), max)).collect(),
    }))
}

async fn day(
    State(state): State<ReportState>,
    Query(params): Query<DayParams>,
) -> Result<Json<DayResponse>, ApiError> {
    let (Some(destination), Some(date)) = (non_blank(params.destination), non_blank(params.date)) else {
        return Err(ApiError::BadRequest("destination and date are required".to_string()));
    };
    let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date '{date}', expected YYYY-MM-DD")))?;

    let offset = state.offset;
    let dest = destination.clone();
    let entries = with_read_store(state.db_path, move |store| store.day(&dest, parsed, offset)).await?;

    Ok(Json(DayResponse {
        destination,
        date: parsed.to_string(),
        data: entries,
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
