//! Out-of-band maintenance tools.
//!
//! These are the only paths that delete rows; the sampler never does.

pub mod seed;

pub use seed::{generate_year, seed_store, SeedOptions, SeedSummary};

use crate::store::{ObservationStore, StoreResult};

/// Delete every observation from UTC `year`.
pub fn purge_year(store: &mut ObservationStore, year: i32) -> StoreResult<usize> {
    let deleted = store.delete_year(year)?;
    tracing::warn!(year, deleted, "Purged observations");
    Ok(deleted)
}
