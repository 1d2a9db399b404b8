//! Sampling subsystem.
//!
//! # Data Flow
//! ```text
//! scheduler.rs (run-once | run-forever)
//!     → orchestrator.rs (one timestamp per round)
//!         → forward fetch: origin → [destinations]
//!         → reverse fetches: destination_i → [origin], sequentially
//!         → store: forward + reverse appended in one transaction
//! ```
//!
//! # Design Decisions
//! - A failure on any leg discards the round; nothing partial is stored
//! - Sequential execution; one round at a time
//! - Errors propagate to the caller; the loop does not swallow them

pub mod orchestrator;
pub mod scheduler;

pub use orchestrator::{Sampler, SamplingError};
pub use scheduler::Scheduler;
