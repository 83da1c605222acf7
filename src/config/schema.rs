//! Configuration schema definitions.
//!
//! All types derive Serde traits so a logging section can be loaded from a
//! TOML file. Every field has a default, so an empty file is a valid
//! production configuration.

use serde::{Deserialize, Serialize};

use crate::core::level::Level;

/// Port of the level endpoint when none is configured.
pub const DEFAULT_LEVEL_ENDPOINT_PORT: u16 = 53835;

/// Root logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Debug threshold, verbose caller info, no sampling.
    pub development: bool,

    /// Initial threshold. Defaults to `debug` in development, `info` otherwise.
    pub level: Option<String>,

    /// Sampling of repeated records.
    pub sampling: SamplingConfig,

    /// Runtime level control over HTTP.
    pub level_endpoint: LevelEndpointConfig,

    /// Correlation ID keys applied at initialization.
    pub correlation: CorrelationConfig,

    /// Route `tracing` events from other libraries into this logger.
    pub tracing_bridge: BridgeConfig,
}

impl LoggingConfig {
    /// The two switches of `init`, everything else at its default.
    pub fn new(development: bool, enable_level_endpoint: bool) -> Self {
        Self {
            development,
            level_endpoint: LevelEndpointConfig {
                enabled: enable_level_endpoint,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self::new(true, false)
    }

    pub fn production() -> Self {
        Self::new(false, false)
    }

    /// Threshold named by `level`, or the mode default. Unknown names fall
    /// back to the mode default; validation reports them.
    pub fn initial_level(&self) -> Level {
        let mode_default = if self.development {
            Level::Debug
        } else {
            Level::Info
        };
        self.level
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or(mode_default)
    }

    /// Whether sampling applies, after mode defaults.
    pub fn sampling_enabled(&self) -> bool {
        self.sampling.enabled.unwrap_or(!self.development)
    }
}

/// Sampling configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Explicit switch. Unset means on in production, off in development.
    pub enabled: Option<bool>,

    /// Records per tick that always pass.
    pub initial: u64,

    /// After the burst, every n-th record passes. Zero drops the rest.
    pub thereafter: u64,

    /// Tick length in milliseconds.
    pub tick_ms: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            initial: 100,
            thereafter: 100,
            tick_ms: 1000,
        }
    }
}

/// Level endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LevelEndpointConfig {
    /// Serve `/loglevel`.
    pub enabled: bool,

    /// Bind address (e.g., "0.0.0.0:53835").
    pub bind_address: String,
}

impl Default for LevelEndpointConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: format!("0.0.0.0:{}", DEFAULT_LEVEL_ENDPOINT_PORT),
        }
    }
}

/// Correlation key overrides. Unset or empty keys leave the current key alone.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Record key the correlation ID is emitted under.
    pub field_key: Option<String>,

    /// Context key the correlation ID is looked up by.
    pub context_key: Option<String>,
}

/// Tracing bridge configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Install the bridge as the global `tracing` subscriber.
    pub enabled: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults() {
        let dev = LoggingConfig::development();
        assert_eq!(dev.initial_level(), Level::Debug);
        assert!(!dev.sampling_enabled());

        let prod = LoggingConfig::production();
        assert_eq!(prod.initial_level(), Level::Info);
        assert!(prod.sampling_enabled());
    }

    #[test]
    fn test_explicit_level_and_sampling_override_mode() {
        let mut config = LoggingConfig::development();
        config.level = Some("warn".into());
        config.sampling.enabled = Some(true);

        assert_eq!(config.initial_level(), Level::Warn);
        assert!(config.sampling_enabled());
    }

    #[test]
    fn test_empty_toml_is_production() {
        let config: LoggingConfig = toml::from_str("").unwrap();
        assert_eq!(config, LoggingConfig::production());
        assert_eq!(config.level_endpoint.bind_address, "0.0.0.0:53835");
    }

    #[test]
    fn test_partial_toml() {
        let config: LoggingConfig = toml::from_str(
            r#"
            development = true

            [level_endpoint]
            enabled = true

            [correlation]
            field_key = "request_id"
            "#,
        )
        .unwrap();

        assert!(config.development);
        assert!(config.level_endpoint.enabled);
        assert_eq!(config.level_endpoint.bind_address, "0.0.0.0:53835");
        assert_eq!(config.correlation.field_key.as_deref(), Some("request_id"));
        assert!(config.correlation.context_key.is_none());
        assert!(config.tracing_bridge.enabled);
    }
}
