//! Fake data generator for demos and UI work.
//!
//! Produces one forward and one reverse row per destination for every hour
//! of a year, with weekend and rush-hour bumps so the calendar has texture.

use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Timelike, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::store::{Observation, ObservationStore, StoreResult};

const BASE_SECONDS: f64 = 3600.0;
const BASE_STEP_SECONDS: f64 = 600.0;
const FLOOR_SECONDS: i64 = 1200;

/// Parameters for one seeding run.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub year: i32,
    pub seed: u64,
    /// Delete the year's existing rows first.
    pub clear: bool,
}

/// Rows removed and added by [`seed_store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub deleted: usize,
    pub inserted: usize,
}

/// Generate a year of hourly observations (UTC hours) for every destination.
///
/// `offset` decides which hours count as local rush hour or weekend.
pub fn generate_year(
    origin: &str,
    destinations: &[String],
    year: i32,
    seed: u64,
    offset: FixedOffset,
) -> Vec<Observation> {
    let (Some(start), Some(end)) = (
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single(),
        year.checked_add(1)
            .and_then(|next| Utc.with_ymd_and_hms(next, 1, 1, 0, 0, 0).single()),
    ) else {
        return Vec::new();
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::new();
    let mut current = start;
    while current < end {
        let local = current.with_timezone(&offset);
        for (i, destination) in destinations.iter().enumerate() {
            let base = BASE_SECONDS + BASE_STEP_SECONDS * i as f64;
            rows.push(fake_row(origin, destination, fake_duration(&mut rng, base, &local), current));
            rows.push(fake_row(destination, origin, fake_duration(&mut rng, base, &local), current));
        }
        current += Duration::hours(1);
    }
    rows
}

/// Optionally clear `options.year`, then append a generated year in one
/// transaction.
pub fn seed_store(
    store: &mut ObservationStore,
    origin: &str,
    destinations: &[String],
    options: &SeedOptions,
    offset: FixedOffset,
) -> StoreResult<SeedSummary> {
    let deleted = if options.clear {
        store.delete_year(options.year)?
    } else {
        0
    };

    let rows = generate_year(origin, destinations, options.year, options.seed, offset);
    let inserted = store.append(&rows)?;

    tracing::info!(year = options.year, deleted, inserted, "Seeded fake travel times");
    Ok(SeedSummary { deleted, inserted })
}

fn fake_duration(rng: &mut StdRng, base: f64, local: &DateTime<FixedOffset>) -> u32 {
    let weekend = match local.weekday() {
        Weekday::Sat | Weekday::Sun => 1.2,
        _ => 1.0,
    };
    let rush = match local.hour() {
        6..=9 => 1.25,
        15..=18 => 1.35,
        _ => 1.0,
    };
    let noise: i64 = rng.gen_range(-300..=420);
    let seconds = ((base * weekend * rush) as i64 + noise).max(FLOOR_SECONDS);
    u32::try_from(seconds).unwrap_or(u32::MAX)
}

fn fake_row(origin: &str, destination: &str, duration_seconds: u32, at: DateTime<Utc>) -> Observation {
    Observation {
        origin: origin.to_string(),
        destination: destination.to_string(),
        duration_seconds,
        distance_meters: None,
        observed_at: at,
    }
}
