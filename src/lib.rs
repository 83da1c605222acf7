//! Process-wide structured JSON logging with correlation IDs.
//!
//! Call [`init`] once at startup, then fetch handles with [`logger`] or
//! [`sugared_logger`] anywhere in the process:
//!
//! ```no_run
//! corrlog::init(false, true);
//!
//! let log = corrlog::logger().with_correlation_id(&"abc-123");
//! log.info("order accepted", &[corrlog::Field::int("order", 42)]);
//! ```
//!
//! With the level endpoint enabled, `curl -X PUT -d debug
//! localhost:53835/loglevel` changes the level of every handle at runtime.

#[macro_use]
mod macros;

pub mod admin;
pub mod config;
pub mod core;
pub mod http;
pub mod lifecycle;
pub mod logger;
pub mod observability;
pub mod resilience;

pub use crate::config::{load_config, ConfigError, LoggingConfig};
pub use crate::core::entry::Caller;
pub use crate::core::field::Field;
pub use crate::core::hook::{ExitHook, FatalHook, PanicHook};
pub use crate::core::level::{AtomicLevel, Level, LevelParseError};
pub use crate::core::sink::MemoryWriter;
pub use crate::lifecycle::{
    init, init_from_file, init_with, is_initialized, level, logger, sugared_logger, try_logger,
};
pub use crate::logger::{
    correlation_id_context_key, correlation_id_field_key, new_correlation_id,
    set_correlation_id_context_key, set_correlation_id_field_key, BuildError, Context, Logger,
    LoggerBuilder, SugaredLogger, DEFAULT_CORRELATION_KEY,
};
pub use crate::resilience::{
    install_panic_hook, recover_and_log_panic, recover_and_log_panic_async, PANIC_OP,
};
