//! Scheduler loop.
//!
//! # Responsibilities
//! - Run one sampling round on demand (run-once)
//! - Run rounds forever, sleeping a fixed interval after each one
//!
//! # Design Decisions
//! - The wait starts after a round finishes: cadence = interval + round time
//! - No jitter, no drift correction, no in-process retry
//! - Any round error ends the loop; an external supervisor restarts the process

use std::convert::Infallible;
use std::time::Duration;

use tokio::time::sleep;

use crate::config::SamplingConfig;
use crate::distance_matrix::TravelTimeSource;
use crate::sampling::orchestrator::{Sampler, SamplingError};
use crate::store::Observation;

/// Drives a [`Sampler`] for one configured origin and destination list.
pub struct Scheduler<S> {
    sampler: Sampler<S>,
    origin: String,
    destinations: Vec<String>,
    interval: Duration,
}

impl<S: TravelTimeSource> Scheduler<S> {
    pub fn new(sampler: Sampler<S>, config: &SamplingConfig) -> Self {
        Self {
            sampler,
            origin: config.origin.clone(),
            destinations: config.destinations.clone(),
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    /// Pause between rounds.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run exactly one round.
    pub async fn run_once(&self) -> Result<Vec<Observation>, SamplingError> {
        self.sampler.run(&self.origin, &self.destinations).await
    }

    /// Run rounds until one fails. Only ever returns an error.
    pub async fn run_forever(&self) -> Result<Infallible, SamplingError> {
        tracing::info!(
            origin = %self.origin,
            destinations = self.destinations.len(),
            interval_secs = self.interval.as_secs(),
            "Scheduler starting"
        );

        let mut rounds: u64 = 0;
        loop {
            self.run_once().await?;
            rounds += 1;
            tracing::debug!(rounds, next_in_secs = self.interval.as_secs(), "Sleeping until next round");
            sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance_matrix::{FetchError, FetchResult, TravelTime};
    use crate::store::ObservationStore;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;
    use tokio::time::Instant;

    /// Answers every call with one leg per destination until `fail_after`
    /// calls have been served.
    struct CountingSource {
        calls: AtomicU32,
        fail_after: u32,
    }

    impl TravelTimeSource for CountingSource {
        async fn fetch(&self, _origin: &str, destinations: &[String]) -> FetchResult<Vec<TravelTime>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.fail_after {
                return Err(FetchError::Malformed("scripted failure".to_string()));
            }
            Ok(destinations
                .iter()
                .map(|d| TravelTime {
                    destination: d.clone(),
                    duration_seconds: 600,
                    distance_meters: None,
                })
                .collect())
        }
    }

    fn config() -> SamplingConfig {
        SamplingConfig {
            origin: "Golden".to_string(),
            destinations: vec!["Frisco".to_string()],
            interval_secs: 3600,
        }
    }

    #[tokio::test]
    async fn test_run_once() {
        let dir = TempDir::new().unwrap();
        let source = CountingSource { calls: AtomicU32::new(0), fail_after: u32::MAX };
        let scheduler = Scheduler::new(Sampler::new(source, dir.path().join("t.sqlite")), &config());

        let rows = scheduler.run_once().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(scheduler.interval(), Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_forever_stops_on_first_error() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("t.sqlite");
        // Two fetches per round (forward + one reverse): three good rounds,
        // then the forward fetch of the fourth fails.
        let source = CountingSource { calls: AtomicU32::new(0), fail_after: 6 };
        let scheduler = Scheduler::new(Sampler::new(source, &db), &config());

        let started = Instant::now();
        let err = scheduler.run_forever().await.unwrap_err();

        assert!(matches!(err, SamplingError::Fetch(FetchError::Malformed(_))));
        assert_eq!(ObservationStore::open_ready(&db).unwrap().count().unwrap(), 6);
        assert!(started.elapsed() >= Duration::from_secs(3 * 3600));
    }
}
