//! Logging backend.
//!
//! # Data Flow
//! ```text
//! handle (Logger / SugaredLogger)
//!     → Core::log (level check against the AtomicLevel)
//!     → sampler.rs (burst-then-throttle, production only)
//!     → encoder.rs (one JSON object per record)
//!     → sink.rs (MakeWriter for records, second MakeWriter for internal errors)
//!     → hook.rs (dpanic / panic / fatal termination)
//! ```
//!
//! The backend knows nothing about correlation IDs or process-wide state;
//! those live in the facade on top of it.

pub mod encoder;
pub mod entry;
pub mod field;
pub mod hook;
pub mod level;
pub mod sampler;
pub mod sink;

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::sync::Arc;

use chrono::Utc;

use self::encoder::JsonEncoder;
use self::entry::{Caller, Entry};
use self::field::{merge_fields, Field};
use self::hook::FatalHook;
use self::level::{AtomicLevel, Level};
use self::sampler::Sampler;
use self::sink::Sink;

/// One logging call on its way through the backend.
pub(crate) struct Record<'a> {
    pub level: Level,
    pub caller: Caller,
    pub message: &'a str,
    pub logger_name: Option<&'a str>,
    /// Fields already attached to the handle.
    pub context: &'a [Field],
    /// Fields passed with this call.
    pub fields: &'a [Field],
    /// Explicit stack trace; otherwise one is captured at or above the
    /// core's stack trace level.
    pub stack: Option<String>,
}

/// Shared backend state behind every handle.
#[derive(Debug)]
pub struct Core {
    level: AtomicLevel,
    encoder: JsonEncoder,
    sampler: Option<Sampler>,
    sink: Sink,
    development: bool,
    fatal_hook: Arc<dyn FatalHook>,
}

impl Core {
    pub fn new(
        level: AtomicLevel,
        encoder: JsonEncoder,
        sampler: Option<Sampler>,
        sink: Sink,
        development: bool,
        fatal_hook: Arc<dyn FatalHook>,
    ) -> Self {
        Self {
            level,
            encoder,
            sampler,
            sink,
            development,
            fatal_hook,
        }
    }

    pub fn atomic_level(&self) -> &AtomicLevel {
        &self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level)
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    /// Records at or above this level get a stack trace attached.
    pub fn stacktrace_level(&self) -> Level {
        if self.development {
            Level::Warn
        } else {
            Level::Error
        }
    }

    /// Write the record if it passes the level and the sampler, then apply
    /// the termination policy of its level. Terminal levels terminate even
    /// when the record itself was filtered out.
    #[track_caller]
    pub(crate) fn log(&self, record: Record<'_>) {
        match record.level {
            Level::Fatal => self.log_fatal(record),
            Level::Panic => self.write_then_panic(record),
            Level::DPanic if self.development => self.write_then_panic(record),
            _ => self.write(&record),
        }
    }

    #[track_caller]
    pub(crate) fn log_fatal(&self, record: Record<'_>) -> ! {
        self.write(&record);
        self.sink.flush();
        hook::mark_logged_panic();
        self.fatal_hook.terminate(record.message)
    }

    #[track_caller]
    pub(crate) fn write_then_panic(&self, record: Record<'_>) -> ! {
        self.write(&record);
        self.sink.flush();
        hook::mark_logged_panic();
        panic!("{}", record.message)
    }

    fn write(&self, record: &Record<'_>) {
        if !self.level.enabled(record.level) {
            return;
        }
        if let Some(sampler) = &self.sampler {
            if !sampler.check(record.level, record.message) {
                return;
            }
        }

        let fields = if record.fields.is_empty() {
            Cow::Borrowed(record.context)
        } else {
            Cow::Owned(merge_fields(record.context, record.fields.iter().cloned()))
        };

        let stack = match &record.stack {
            Some(stack) => Some(Cow::Borrowed(stack.as_str())),
            None if record.level >= self.stacktrace_level() => {
                Some(Cow::Owned(Backtrace::force_capture().to_string()))
            }
            None => None,
        };

        let function = match record.caller.function {
            Some(function) => Some(Cow::Borrowed(function)),
            None if self.encoder.config().function_key.is_some() => {
                record.caller.resolve_function().map(Cow::Owned)
            }
            None => None,
        };

        let entry = Entry {
            level: record.level,
            time: Utc::now(),
            logger_name: record.logger_name,
            message: record.message,
            caller: record.caller,
            function: function.as_deref(),
            stack: stack.as_deref(),
        };

        let mut buf = Vec::with_capacity(256);
        match self.encoder.encode(&entry, &fields, &mut buf) {
            Ok(()) => self.sink.write_record(&buf),
            Err(e) => self.sink.report_error("encode error", &e),
        }
    }

    /// Flush buffered output.
    pub fn sync(&self) {
        self.sink.flush();
    }

    /// Report a logger-internal failure on the error output.
    pub fn report_error(&self, context: &str, err: &dyn std::fmt::Display) {
        self.sink.report_error(context, err);
    }
}
