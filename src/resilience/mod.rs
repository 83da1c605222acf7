//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Unit of work (thread body, spawned task):
//!     → recovery.rs (catch_unwind around the work)
//!     → On panic: fatal record with op = "panic_logger" and the stack
//!     → Fatal hook (process exit)
//! ```
//!
//! A panic is never swallowed: logging happens on the way to termination.

pub mod recovery;

pub use recovery::{
    install_panic_hook, log_panic, panic_message, recover_and_log_panic,
    recover_and_log_panic_async, recover_and_log_panic_async_with, recover_and_log_panic_with,
    PANIC_OP,
};
