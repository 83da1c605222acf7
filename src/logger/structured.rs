//! The structured handle.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::config::LoggingConfig;
use crate::core::entry::Caller;
use crate::core::field::{merge_fields, Field};
use crate::core::level::{AtomicLevel, Level};
use crate::core::{Core, Record};
use crate::logger::builder::{BuildError, LoggerBuilder};
use crate::logger::context::Context;
use crate::logger::keys::correlation_id_context_key;
use crate::logger::{correlation_field, SugaredLogger};

/// Structured logging handle: typed fields in, one JSON record out.
///
/// A handle is an immutable snapshot. `with`, `named` and the correlation
/// methods return new handles; the receiver keeps its own fields.
#[derive(Debug, Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<Arc<str>>,
    fields: Arc<[Field]>,
}

impl Logger {
    pub(crate) fn from_core(core: Arc<Core>) -> Self {
        Self {
            core,
            name: None,
            fields: Arc::from(Vec::new()),
        }
    }

    /// Standalone logger writing to stdout, not registered process-wide.
    pub fn build(config: &LoggingConfig) -> Result<Self, BuildError> {
        LoggerBuilder::new(config.clone()).build()
    }

    pub fn builder(config: LoggingConfig) -> LoggerBuilder {
        LoggerBuilder::new(config)
    }

    /// New handle carrying `fields` after the existing ones.
    pub fn with<I>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        Self {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            fields: merge_fields(&self.fields, fields).into(),
        }
    }

    /// New handle carrying `value` as the correlation ID when it is a
    /// `String` or `&'static str`. Any other value returns an equivalent
    /// handle unchanged.
    pub fn with_correlation_id(&self, value: &dyn Any) -> Self {
        match correlation_field(value) {
            Some(field) => self.with([field]),
            None => self.clone(),
        }
    }

    /// [`with_correlation_id`](Self::with_correlation_id) with the value
    /// found under the correlation context key of `ctx`.
    pub fn with_context_correlation_id(&self, ctx: &Context) -> Self {
        match ctx.value(correlation_id_context_key().as_str()) {
            Some(value) => self.with_correlation_id(value),
            None => self.clone(),
        }
    }

    /// New handle whose name is this name plus `name`, dot-separated.
    pub fn named(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let name: Arc<str> = match &self.name {
            Some(parent) => format!("{}.{}", parent, name).into(),
            None => name.into(),
        };
        Self {
            core: Arc::clone(&self.core),
            name: Some(name),
            fields: Arc::clone(&self.fields),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn sugar(&self) -> SugaredLogger {
        SugaredLogger::from_logger(self.clone())
    }

    pub fn level(&self) -> Level {
        self.core.atomic_level().level()
    }

    /// The level atom shared with every handle of this logger.
    pub fn atomic_level(&self) -> AtomicLevel {
        self.core.atomic_level().clone()
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Debug, Caller::here(), msg, fields);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Info, Caller::here(), msg, fields);
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Warn, Caller::here(), msg, fields);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Error, Caller::here(), msg, fields);
    }

    /// Error in production, panic in development.
    #[track_caller]
    pub fn dpanic(&self, msg: &str, fields: &[Field]) {
        self.log(Level::DPanic, Caller::here(), msg, fields);
    }

    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) -> ! {
        self.core
            .write_then_panic(self.record(Level::Panic, Caller::here(), msg, fields, None))
    }

    /// Write, flush, then hand over to the fatal hook.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        self.core
            .log_fatal(self.record(Level::Fatal, Caller::here(), msg, fields, None))
    }

    /// Emit at an explicit level and call site.
    #[track_caller]
    pub fn log(&self, level: Level, caller: Caller, msg: &str, fields: &[Field]) {
        self.core.log(self.record(level, caller, msg, fields, None));
    }

    /// Used by the logging macros.
    #[doc(hidden)]
    #[track_caller]
    pub fn log_args(&self, level: Level, caller: Caller, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(msg) => self.log(level, caller, msg, &[]),
            None => self.log(level, caller, &args.to_string(), &[]),
        }
    }

    #[track_caller]
    pub(crate) fn fatal_with_stack(&self, caller: Caller, msg: &str, stack: String) -> ! {
        self.core
            .log_fatal(self.record(Level::Fatal, caller, msg, &[], Some(stack)))
    }

    /// Flush buffered output.
    pub fn sync(&self) {
        self.core.sync();
    }

    pub(crate) fn report_error(&self, context: &str, err: &dyn fmt::Display) {
        self.core.report_error(context, err);
    }

    fn record<'a>(
        &'a self,
        level: Level,
        caller: Caller,
        message: &'a str,
        fields: &'a [Field],
        stack: Option<String>,
    ) -> Record<'a> {
        Record {
            level,
            caller,
            message,
            logger_name: self.name.as_deref(),
            context: &self.fields,
            fields,
            stack,
        }
    }
}
