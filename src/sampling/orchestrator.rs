//! Sampling round orchestration.
//!
//! # Responsibilities
//! - Stamp a round with one shared observation time
//! - Fetch forward (origin → all destinations) then reverse legs one by one
//! - Persist the whole round atomically, or nothing on any failure

use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{AppConfig, SamplingConfig};
use crate::distance_matrix::{FetchError, TravelTime, TravelTimeSource};
use crate::observability::metrics;
use crate::store::{with_store, Observation, StoreError};

/// Errors that abort a sampling round.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("storage failed: {0}")]
    Storage(#[from] StoreError),
}

/// Runs sampling rounds against one store.
pub struct Sampler<S> {
    source: S,
    store_path: PathBuf,
}

impl<S: TravelTimeSource> Sampler<S> {
    /// Create a sampler writing to `store_path`.
    pub fn new(source: S, store_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            store_path: store_path.into(),
        }
    }

    /// Create a sampler from application configuration.
    pub fn from_config(source: S, config: &AppConfig) -> Self {
        Self::new(source, &config.store.path)
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Run one round for the configured origin and destinations.
    pub async fn run_configured(&self, config: &SamplingConfig) -> Result<Vec<Observation>, SamplingError> {
        self.run(&config.origin, &config.destinations).await
    }

    /// Run one round stamped with the current time.
    pub async fn run(&self, origin: &str, destinations: &[String]) -> Result<Vec<Observation>, SamplingError> {
        self.run_at(origin, destinations, Utc::now().trunc_subsecs(0)).await
    }

    /// Run one round with an explicit observation time.
    ///
    /// Returns forward observations followed by reverse observations, exactly
    /// as written.
    pub async fn run_at(
        &self,
        origin: &str,
        destinations: &[String],
        observed_at: DateTime<Utc>,
    ) -> Result<Vec<Observation>, SamplingError> {
        let span = tracing::info_span!(
            "sampling_round",
            run_id = %Uuid::new_v4(),
            origin = %origin,
            observed_at = %observed_at.to_rfc3339(),
        );

        let result = self
            .round(origin, destinations, observed_at)
            .instrument(span.clone())
            .await;

        let _entered = span.enter();
        match &result {
            Ok(observations) => {
                metrics::record_sampling_round("ok");
                metrics::record_observations_stored(observations.len());
                tracing::info!(rows = observations.len(), "Sampling round stored");
            }
            Err(e) => {
                metrics::record_sampling_round("failed");
                tracing::error!(error = %e, "Sampling round discarded");
            }
        }
        result
    }

    async fn round(
        &self,
        origin: &str,
        destinations: &[String],
        observed_at: DateTime<Utc>,
    ) -> Result<Vec<Observation>, SamplingError> {
        let forward: Vec<Observation> = self
            .source
            .fetch(origin, destinations)
            .await?
            .into_iter()
            .map(|time| observation(origin, time, observed_at))
            .collect();

        let target = [origin.to_string()];
        let mut reverse = Vec::with_capacity(destinations.len());
        for destination in destinations {
            let legs = self.source.fetch(destination, &target).await?;
            match legs.into_iter().next() {
                Some(time) => reverse.push(observation(destination, time, observed_at)),
                None => tracing::debug!(destination = %destination, "Reverse leg returned nothing, skipping"),
            }
        }

        let (forward, reverse) = with_store(self.store_path.clone(), move |store| {
            store.append_batches(&[forward.as_slice(), reverse.as_slice()])?;
            Ok((forward, reverse))
        })
        .await?;

        let mut stored = forward;
        stored.extend(reverse);
        Ok(stored)
    }
}

fn observation(origin: &str, time: TravelTime, observed_at: DateTime<Utc>) -> Observation {
    Observation {
        origin: origin.to_string(),
        destination: time.destination,
        duration_seconds: time.duration_seconds,
        distance_meters: time.distance_meters,
        observed_at,
    }
}
