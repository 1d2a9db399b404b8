//! Travel-time fetching subsystem.
//!
//! # Data Flow
//! ```text
//! (origin, [destinations])
//!     → client.rs (one GET, all destinations pipe-joined)
//!     → types.rs (deserialize → validate → Vec<TravelTime>)
//! ```
//!
//! # Design Decisions
//! - One request per call; no retries and no caching
//! - Every malformed shape maps to a named FetchError variant
//! - A single bad element aborts the whole batch

use std::future::Future;

pub mod client;
pub mod types;

pub use client::DistanceMatrixClient;
pub use types::{parse_response, ClientError, FetchError, FetchResult, TravelTime};

/// Anything that can answer "how long from `origin` to each destination".
///
/// The sampling orchestrator depends on this rather than on the HTTP client
/// directly.
pub trait TravelTimeSource: Send + Sync {
    fn fetch(
        &self,
        origin: &str,
        destinations: &[String],
    ) -> impl Future<Output = FetchResult<Vec<TravelTime>>> + Send;
}

impl TravelTimeSource for DistanceMatrixClient {
    fn fetch(
        &self,
        origin: &str,
        destinations: &[String],
    ) -> impl Future<Output = FetchResult<Vec<TravelTime>>> + Send {
        DistanceMatrixClient::fetch(self, origin, destinations)
    }
}
