//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoggingConfig (validated)
//!     → LoggerBuilder → Logger
//! ```
//!
//! Every field has a default, and `LoggingConfig::new(development,
//! enable_level_endpoint)` covers the common case without a file.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BridgeConfig, CorrelationConfig, LevelEndpointConfig, LoggingConfig, SamplingConfig,
    DEFAULT_LEVEL_ENDPOINT_PORT,
};
pub use validation::{validate_config, ValidationError};
