//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (origin, destination, run_id) instead of formatted text
//! - Each sampling round runs inside a span carrying its run ID
//! - Metrics are cheap (atomic increments) and off unless enabled

pub mod logging;
pub mod metrics;
