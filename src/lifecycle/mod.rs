//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Validate → Init logging/metrics → Run command
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown of the query API
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The sampler has no cancellation path; process termination stops it

pub mod signals;
