//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → passed by reference into scheduler, orchestrator, fetcher, reporting
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing reads the environment later
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ApiConfig, AppConfig, LogFormat, ObservabilityConfig, ReportingConfig, SamplingConfig,
    StoreConfig,
};
pub use validation::{parse_utc_offset, validate_config, validate_for_sampling, ValidationError};
