//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (binaries)
//!     → validation.rs (semantic checks)
//!     → ProbeConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once validated; one probe run uses one config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{read_config, read_or_default, ConfigError};
pub use schema::{ApacheConfig, HaproxyConfig, ProbeConfig, ThresholdConfig};
pub use validation::{validate_config, ValidationError};
