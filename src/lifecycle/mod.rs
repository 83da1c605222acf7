//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     LoggingConfig → LoggerBuilder::build → process-wide Logger
//!         → correlation keys → level endpoint → tracing bridge
//!         → "Logger initialized successfully"
//!
//! Accessors:
//!     logger() / sugared_logger() → clone of the process-wide handle
//! ```
//!
//! There is no shutdown step: the logger and the endpoint thread live for
//! the rest of the process.

pub mod startup;

pub use startup::{
    init, init_from_file, init_with, is_initialized, level, logger, sugared_logger, try_logger,
};
