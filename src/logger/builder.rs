//! Building a logger from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::{validate_config, LoggingConfig, ValidationError};
use crate::core::encoder::{EncoderConfig, JsonEncoder};
use crate::core::hook::{ExitHook, FatalHook};
use crate::core::level::AtomicLevel;
use crate::core::sampler::Sampler;
use crate::core::sink::Sink;
use crate::core::Core;
use crate::logger::Logger;

/// Error returned when a logger cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    InvalidConfig(Vec<ValidationError>),
}

/// Builds a [`Logger`] from a [`LoggingConfig`] plus the runtime pieces a
/// config file cannot express: output writers and the fatal hook.
pub struct LoggerBuilder {
    config: LoggingConfig,
    writer: Option<BoxMakeWriter>,
    error_writer: Option<BoxMakeWriter>,
    fatal_hook: Option<Arc<dyn FatalHook>>,
}

impl LoggerBuilder {
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            config,
            writer: None,
            error_writer: None,
            fatal_hook: None,
        }
    }

    /// Record output. Defaults to stdout.
    pub fn writer<W>(mut self, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.writer = Some(BoxMakeWriter::new(writer));
        self
    }

    /// Output for logger-internal errors. Defaults to stderr.
    pub fn error_writer<W>(mut self, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.error_writer = Some(BoxMakeWriter::new(writer));
        self
    }

    /// Termination policy for fatal records. Defaults to [`ExitHook`].
    pub fn fatal_hook(mut self, hook: impl FatalHook + 'static) -> Self {
        self.fatal_hook = Some(Arc::new(hook));
        self
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    pub fn build(self) -> Result<Logger, BuildError> {
        validate_config(&self.config).map_err(BuildError::InvalidConfig)?;

        let config = &self.config;
        let encoder = if config.development {
            EncoderConfig::development()
        } else {
            EncoderConfig::production()
        };
        let sampler = config.sampling_enabled().then(|| {
            Sampler::new(
                config.sampling.initial,
                config.sampling.thereafter,
                Duration::from_millis(config.sampling.tick_ms),
            )
        });
        let sink = Sink::new(
            self.writer
                .unwrap_or_else(|| BoxMakeWriter::new(std::io::stdout)),
            self.error_writer
                .unwrap_or_else(|| BoxMakeWriter::new(std::io::stderr)),
        );
        let fatal_hook = self
            .fatal_hook
            .unwrap_or_else(|| Arc::new(ExitHook::default()));

        let core = Core::new(
            AtomicLevel::new(config.initial_level()),
            JsonEncoder::new(encoder),
            sampler,
            sink,
            config.development,
            fatal_hook,
        );
        Ok(Logger::from_core(Arc::new(core)))
    }
}
