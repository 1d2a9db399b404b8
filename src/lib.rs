//! Drive-times sampler library.
//!
//! Periodically samples driving time between one origin and a set of
//! destinations through a distance-matrix API, keeps every sample in an
//! append-only SQLite table, and serves read-only reports over it.

pub mod config;
pub mod distance_matrix;
pub mod lifecycle;
pub mod maintenance;
pub mod observability;
pub mod reporting;
pub mod sampling;
pub mod store;

pub use config::AppConfig;
pub use distance_matrix::{DistanceMatrixClient, FetchError, TravelTime, TravelTimeSource};
pub use sampling::{Sampler, SamplingError, Scheduler};
pub use store::{Observation, ObservationStore, StoreError};
