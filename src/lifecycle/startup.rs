//! Process-wide initialization and accessors.
//!
//! # Responsibilities
//! - Build the process logger exactly once
//! - Apply correlation key overrides from the configuration
//! - Start the level endpoint and the tracing bridge when enabled
//! - Hand out handles; refuse to before initialization

use std::net::SocketAddr;
use std::path::Path;
use std::sync::OnceLock;

use crate::admin::{spawn_level_endpoint, LEVEL_ROUTE};
use crate::config::{load_config, ConfigError, LoggingConfig};
use crate::core::field::Field;
use crate::core::level::AtomicLevel;
use crate::logger::{
    set_correlation_id_context_key, set_correlation_id_field_key, Logger, LoggerBuilder,
    SugaredLogger,
};
use crate::observability::bridge::install_tracing_bridge;

static LOGGER: OnceLock<Logger> = OnceLock::new();

const NOT_INITIALIZED: &str = "logger not initialized. Call init()";

/// Bootstrap the process logger.
///
/// Call once at the start of the process, before spawning work. Later calls
/// are no-ops, including concurrent ones: exactly one logger is built.
///
/// `development_mode` selects a debug threshold, full caller paths and the
/// `func` key, with no sampling. Otherwise the threshold is info, callers are
/// shortened and repeated records are sampled.
///
/// `enable_level_endpoint` serves `/loglevel` on port 53835 in the
/// background. A failure to bind is reported on stderr and does not stop
/// initialization.
///
/// # Panics
///
/// If the logger cannot be built.
pub fn init(development_mode: bool, enable_level_endpoint: bool) {
    init_with(LoggerBuilder::new(LoggingConfig::new(
        development_mode,
        enable_level_endpoint,
    )));
}

/// [`init`] with a full configuration and custom writers or fatal hook.
///
/// # Panics
///
/// If the logger cannot be built.
pub fn init_with(builder: LoggerBuilder) {
    if LOGGER.get().is_some() {
        return;
    }
    LOGGER.get_or_init(|| bootstrap(builder));
}

/// [`init_with`] from a TOML configuration file.
///
/// Errors reading or validating the file are returned; a valid file that
/// still fails to build panics like [`init`].
pub fn init_from_file(path: &Path) -> Result<(), ConfigError> {
    let config = load_config(path)?;
    init_with(LoggerBuilder::new(config));
    Ok(())
}

fn bootstrap(builder: LoggerBuilder) -> Logger {
    let config = builder.config().clone();
    let logger = match builder.build() {
        Ok(logger) => logger,
        Err(e) => panic!("logger initialization error: {}", e),
    };

    if let Some(key) = &config.correlation.field_key {
        set_correlation_id_field_key(key);
    }
    if let Some(key) = &config.correlation.context_key {
        set_correlation_id_context_key(key);
    }

    let mut modes = vec![if config.development { "dev" } else { "prod" }];
    let mut endpoint = None;
    if config.level_endpoint.enabled {
        modes.push("serveHttp");
        // validated by build()
        if let Ok(addr) = config.level_endpoint.bind_address.parse::<SocketAddr>() {
            match spawn_level_endpoint(addr, logger.clone()) {
                Ok(bound) => endpoint = Some(bound),
                Err(e) => logger.report_error(&format!("level endpoint bind {}", addr), &e),
            }
        }
    }

    if config.tracing_bridge.enabled && !install_tracing_bridge(logger.clone()) {
        logger.report_error(
            "tracing bridge",
            &"a global tracing subscriber is already installed",
        );
    }

    logger.info(
        "Logger initialized successfully",
        &[Field::strings("logger_modes", modes)],
    );
    if let Some(addr) = endpoint {
        logger.info(
            &format!("Logger HTTP Server active on {}{}", display_addr(addr), LEVEL_ROUTE),
            &[],
        );
    }

    logger
}

/// `:53835` for wildcard binds, the full address otherwise.
fn display_addr(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!(":{}", addr.port())
    } else {
        addr.to_string()
    }
}

/// The process logger.
///
/// # Panics
///
/// If [`init`] has not been called.
pub fn logger() -> Logger {
    match LOGGER.get() {
        Some(logger) => logger.clone(),
        None => panic!("{}", NOT_INITIALIZED),
    }
}

/// The process logger, sugared.
///
/// # Panics
///
/// If [`init`] has not been called.
pub fn sugared_logger() -> SugaredLogger {
    match LOGGER.get() {
        Some(logger) => logger.sugar(),
        None => panic!("{}", NOT_INITIALIZED),
    }
}

/// The process logger, if initialized.
pub fn try_logger() -> Option<Logger> {
    LOGGER.get().cloned()
}

pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

/// The process logger's level atom.
///
/// # Panics
///
/// If [`init`] has not been called.
pub fn level() -> AtomicLevel {
    logger().atomic_level()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_addr() {
        assert_eq!(display_addr("0.0.0.0:53835".parse().unwrap()), ":53835");
        assert_eq!(display_addr("127.0.0.1:9000".parse().unwrap()), "127.0.0.1:9000");
    }
}
