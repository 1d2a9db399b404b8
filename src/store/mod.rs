//! Observation store subsystem.
//!
//! # Data Flow
//! ```text
//! Sampling round:
//!     orchestrator → with_store (blocking pool)
//!     → open → ensure_schema → append_batches (one transaction) → close
//!
//! Reporting:
//!     query API / exporter → open_read_only → destinations | years | calendar | day
//! ```
//!
//! # Design Decisions
//! - Append-only: no update paths; delete exists only for maintenance
//! - One connection per round or request, no pooling
//! - Timestamps stored as UTC RFC 3339 text; display offsets applied on read

pub mod observation;
pub mod queries;
pub mod sqlite;

pub use observation::{
    format_observed_at, parse_observed_at, Observation, StoreError, StoreResult,
};
pub use queries::DayEntry;
pub use sqlite::{with_read_store, with_store, ObservationStore};
