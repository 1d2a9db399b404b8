//! Reporting subsystem (read-only).
//!
//! # Data Flow
//! ```text
//! Observation store (UTC rows)
//!     → store::queries (bucket by configured display offset)
//!     → api.rs (JSON over HTTP, per-request connection)
//!     → export.rs (static JSON tree)
//! ```
//!
//! # Design Decisions
//! - Never writes to the store
//! - Display offset is explicit configuration, not baked into queries

pub mod api;
pub mod export;
pub mod slug;

pub use api::{router, serve, ApiError, ReportState};
pub use export::{export_static, ExportError, ExportSummary};
