//! Distance-matrix wire types, validation and error definitions.

use serde::Deserialize;
use thiserror::Error;

/// Status value the API uses for success, both top-level and per element.
pub const STATUS_OK: &str = "OK";

/// Travel time to one destination, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelTime {
    pub destination: String,
    pub duration_seconds: u32,
    pub distance_meters: Option<u32>,
}

/// Errors that can occur while fetching travel times.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure or non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a top-level status other than OK.
    #[error("API status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    ApiStatus {
        status: String,
        message: Option<String>,
    },

    /// Body missing rows, wrong element count, or not the expected JSON shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// One destination's element reported a non-OK status.
    #[error("element status {status} for destination {destination}")]
    ElementStatus { destination: String, status: String },

    /// Neither `duration_in_traffic` nor `duration` carried a value.
    #[error("missing duration for destination {destination}")]
    MissingField { destination: String },
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors building a [`DistanceMatrixClient`](super::DistanceMatrixClient).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Top-level fields, read before anything row-shaped.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    #[serde(default)]
    status: String,
    duration: Option<ValueField>,
    duration_in_traffic: Option<ValueField>,
    distance: Option<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: Option<f64>,
}

impl MatrixElement {
    fn duration_seconds(&self) -> Result<Option<u32>, String> {
        self.duration_in_traffic
            .as_ref()
            .and_then(|f| f.value)
            .or_else(|| self.duration.as_ref().and_then(|f| f.value))
            .map(whole_units)
            .transpose()
    }

    fn distance_meters(&self) -> Result<Option<u32>, String> {
        self.distance
            .as_ref()
            .and_then(|f| f.value)
            .map(whole_units)
            .transpose()
    }
}

/// Truncate a non-negative numeric value to whole units.
fn whole_units(value: f64) -> Result<u32, String> {
    if value.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(value.trunc() as u32)
    } else {
        Err(format!("value {value} is out of range"))
    }
}

/// Parse and validate a response body for `destinations`.
///
/// Returns one travel time per destination, in order, or the first problem
/// found. Nothing partial is ever returned.
pub fn parse_response(destinations: &[String], body: &str) -> FetchResult<Vec<TravelTime>> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("invalid JSON body: {e}")))?;

    if envelope.status != STATUS_OK {
        return Err(FetchError::ApiStatus {
            status: envelope.status,
            message: envelope.error_message,
        });
    }

    let response: MatrixResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("unexpected response shape: {e}")))?;

    let row = response
        .rows
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Malformed("response has no rows".to_string()))?;

    if row.elements.len() != destinations.len() {
        return Err(FetchError::Malformed(format!(
            "expected {} elements, got {}",
            destinations.len(),
            row.elements.len()
        )));
    }

    destinations
        .iter()
        .zip(row.elements)
        .map(|(destination, element)| {
            if element.status != STATUS_OK {
                return Err(FetchError::ElementStatus {
                    destination: destination.clone(),
                    status: element.status,
                });
            }
            let out_of_range = |e: String| FetchError::Malformed(format!("{destination}: {e}"));
            let duration_seconds = element
                .duration_seconds()
                .map_err(out_of_range)?
                .ok_or_else(|| FetchError::MissingField {
                    destination: destination.clone(),
                })?;
            Ok(TravelTime {
                destination: destination.clone(),
                duration_seconds,
                distance_meters: element.distance_meters().map_err(out_of_range)?,
            })
        })
        .collect()
}
