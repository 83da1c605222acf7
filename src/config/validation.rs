//! Configuration validation.
//!
//! Serde handles syntax; this module checks values: level names, sampling
//! tick, endpoint bind address. All problems are reported, not just the first.

use std::net::SocketAddr;

use crate::config::schema::LoggingConfig;
use crate::core::level::Level;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown level {0:?}")]
    UnknownLevel(String),

    #[error("sampling tick must be greater than zero")]
    ZeroSamplingTick,

    #[error("invalid level endpoint bind address {0:?}")]
    InvalidBindAddress(String),
}

/// Check every value serde cannot check.
pub fn validate_config(config: &LoggingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(name) = &config.level {
        if name.parse::<Level>().is_err() {
            errors.push(ValidationError::UnknownLevel(name.clone()));
        }
    }

    if config.sampling_enabled() && config.sampling.tick_ms == 0 {
        errors.push(ValidationError::ZeroSamplingTick);
    }

    if config.level_endpoint.enabled
        && config.level_endpoint.bind_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidBindAddress(
            config.level_endpoint.bind_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
