//! Routing API client.
//!
//! # Responsibilities
//! - Issue one distance-matrix request per batch of destinations
//! - Map HTTP failures to transport errors, bodies to typed travel times
//! - Keep the API key out of errors and logs

use std::time::{Duration, Instant};

use crate::config::ApiConfig;
use crate::distance_matrix::types::{parse_response, ClientError, FetchError, FetchResult, TravelTime};
use crate::observability::metrics;

/// Distance-matrix HTTP client.
#[derive(Clone)]
pub struct DistanceMatrixClient {
    http: reqwest::Client,
    base_url: url::Url,
    api_key: String,
}

impl DistanceMatrixClient {
    /// Create a client from validated configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url =
            url::Url::parse(&config.base_url).map_err(|source| ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("drive-times/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.key.clone(),
        })
    }

    /// Fetch travel times from `origin` to every destination, in order.
    ///
    /// An empty destination list returns immediately without a request. No
    /// retries: the first failure is returned as is.
    pub async fn fetch(&self, origin: &str, destinations: &[String]) -> FetchResult<Vec<TravelTime>> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let result = self.request(origin, destinations).await;
        metrics::record_api_request(outcome_label(&result), started);

        match &result {
            Ok(times) => tracing::debug!(
                origin = %origin,
                destinations = destinations.len(),
                results = times.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Distance matrix fetched"
            ),
            Err(e) => tracing::warn!(origin = %origin, error = %e, "Distance matrix fetch failed"),
        }
        result
    }

    async fn request(&self, origin: &str, destinations: &[String]) -> FetchResult<Vec<TravelTime>> {
        let joined = destinations.join("|");
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&[
                ("origins", origin),
                ("destinations", joined.as_str()),
                ("mode", "driving"),
                ("departure_time", "now"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(redact)?;

        let body = response.text().await.map_err(redact)?;
        parse_response(destinations, &body)
    }
}

impl std::fmt::Debug for DistanceMatrixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceMatrixClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Drop the request URL, which carries the API key, from a transport error.
fn redact(error: reqwest::Error) -> FetchError {
    FetchError::Transport(error.without_url())
}

fn outcome_label<T>(result: &FetchResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(FetchError::Transport(_)) => "transport_error",
        Err(FetchError::ApiStatus { .. }) => "api_status",
        Err(FetchError::Malformed(_)) => "malformed",
        Err(FetchError::ElementStatus { .. }) => "element_status",
        Err(FetchError::MissingField { .. }) => "missing_field",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MATRIX_PATH: &str = "/maps/api/distancematrix/json";

    fn client_for(server: &MockServer) -> DistanceMatrixClient {
        let config = ApiConfig {
            key: "test-key".to_string(),
            base_url: format!("{}{}", server.uri(), MATRIX_PATH),
            timeout_secs: 5,
        };
        DistanceMatrixClient::new(&config).unwrap()
    }

    fn dests(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_sends_batched_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(MATRIX_PATH))
            .and(query_param("origins", "Golden, CO"))
            .and(query_param("destinations", "Frisco, CO|Winter Park, CO"))
            .and(query_param("mode", "driving"))
            .and(query_param("departure_time", "now"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "rows": [{ "elements": [
                    { "status": "OK", "duration_in_traffic": {"value": 3800}, "duration": {"value": 3600}, "distance": {"value": 10000} },
                    { "status": "OK", "duration_in_traffic": {"value": 5600}, "duration": {"value": 5400}, "distance": {"value": 12000} },
                ]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let times = client_for(&server)
            .fetch("Golden, CO", &dests(&["Frisco, CO", "Winter Park, CO"]))
            .await
            .unwrap();

        let names: Vec<&str> = times.iter().map(|t| t.destination.as_str()).collect();
        assert_eq!(names, vec!["Frisco, CO", "Winter Park, CO"]);
        assert_eq!(times.iter().map(|t| t.duration_seconds).collect::<Vec<_>>(), vec![3800, 5600]);
        assert_eq!(
            times.iter().map(|t| t.distance_meters).collect::<Vec<_>>(),
            vec![Some(10000), Some(12000)]
        );
    }

    #[tokio::test]
    async fn test_empty_destinations_skip_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let times = client_for(&server).fetch("Golden, CO", &[]).await.unwrap();
        assert!(times.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_is_transport_without_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("Golden, CO", &dests(&["Frisco, CO"]))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn test_api_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ZERO_RESULTS",
                "rows": []
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch("Golden, CO", &dests(&["Frisco, CO"]))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::ApiStatus { ref status, .. } if status == "ZERO_RESULTS"));
    }

    #[test]
    fn test_bad_base_url_is_client_error() {
        let config = ApiConfig {
            key: "k".to_string(),
            base_url: "not a url".to_string(),
            timeout_secs: 2,
        };
        let err = DistanceMatrixClient::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { ref url, .. } if url == "not a url"));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let config = ApiConfig {
            key: "k".to_string(),
            base_url: "http://127.0.0.1:9/json".to_string(),
            timeout_secs: 2,
        };
        let err = DistanceMatrixClient::new(&config)
            .unwrap()
            .fetch("Golden, CO", &dests(&["Frisco, CO"]))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
