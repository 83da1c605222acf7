//! The printf-style handle.

use std::any::Any;
use std::fmt::{self, Display};

use serde::Serialize;

use crate::core::entry::Caller;
use crate::core::field::Field;
use crate::core::level::Level;
use crate::logger::context::Context;
use crate::logger::Logger;

/// Convenience handle: loosely typed fields, `Display` messages and
/// `format_args!` variants.
///
/// Same snapshot semantics as [`Logger`]; it wraps one.
#[derive(Debug, Clone)]
pub struct SugaredLogger {
    base: Logger,
}

impl SugaredLogger {
    pub(crate) fn from_logger(base: Logger) -> Self {
        Self { base }
    }

    /// Back to the structured handle, fields included.
    pub fn desugar(&self) -> Logger {
        self.base.clone()
    }

    /// New handle with `key` bound to any serializable value.
    pub fn with(&self, key: &str, value: impl Serialize) -> Self {
        Self::from_logger(self.base.with([Field::any(key, &value)]))
    }

    pub fn with_fields<I>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        Self::from_logger(self.base.with(fields))
    }

    /// See [`Logger::with_correlation_id`].
    pub fn with_correlation_id(&self, value: &dyn Any) -> Self {
        Self::from_logger(self.base.with_correlation_id(value))
    }

    /// See [`Logger::with_context_correlation_id`].
    pub fn with_context_correlation_id(&self, ctx: &Context) -> Self {
        Self::from_logger(self.base.with_context_correlation_id(ctx))
    }

    pub fn named(&self, name: &str) -> Self {
        Self::from_logger(self.base.named(name))
    }

    pub fn level(&self) -> Level {
        self.base.level()
    }

    #[track_caller]
    pub fn debug(&self, msg: impl Display) {
        self.emit(Level::Debug, Caller::here(), msg);
    }

    #[track_caller]
    pub fn info(&self, msg: impl Display) {
        self.emit(Level::Info, Caller::here(), msg);
    }

    #[track_caller]
    pub fn warn(&self, msg: impl Display) {
        self.emit(Level::Warn, Caller::here(), msg);
    }

    #[track_caller]
    pub fn error(&self, msg: impl Display) {
        self.emit(Level::Error, Caller::here(), msg);
    }

    #[track_caller]
    pub fn dpanic(&self, msg: impl Display) {
        self.emit(Level::DPanic, Caller::here(), msg);
    }

    #[track_caller]
    pub fn panic(&self, msg: impl Display) -> ! {
        self.base.panic(&msg.to_string(), &[])
    }

    #[track_caller]
    pub fn fatal(&self, msg: impl Display) -> ! {
        self.base.fatal(&msg.to_string(), &[])
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.base.log_args(Level::Debug, Caller::here(), args);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.base.log_args(Level::Info, Caller::here(), args);
    }

    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.base.log_args(Level::Warn, Caller::here(), args);
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.base.log_args(Level::Error, Caller::here(), args);
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.base.fatal(&args.to_string(), &[])
    }

    #[track_caller]
    pub fn debugw(&self, msg: impl Display, fields: &[Field]) {
        self.emitw(Level::Debug, Caller::here(), msg, fields);
    }

    #[track_caller]
    pub fn infow(&self, msg: impl Display, fields: &[Field]) {
        self.emitw(Level::Info, Caller::here(), msg, fields);
    }

    #[track_caller]
    pub fn warnw(&self, msg: impl Display, fields: &[Field]) {
        self.emitw(Level::Warn, Caller::here(), msg, fields);
    }

    #[track_caller]
    pub fn errorw(&self, msg: impl Display, fields: &[Field]) {
        self.emitw(Level::Error, Caller::here(), msg, fields);
    }

    #[track_caller]
    pub fn fatalw(&self, msg: impl Display, fields: &[Field]) -> ! {
        self.base.fatal(&msg.to_string(), fields)
    }

    // Shims for code written against print-style logger interfaces.

    /// Debug-level record.
    #[track_caller]
    pub fn print(&self, msg: impl Display) {
        self.emit(Level::Debug, Caller::here(), msg);
    }

    /// Debug-level record.
    #[track_caller]
    pub fn println(&self, msg: impl Display) {
        self.emit(Level::Debug, Caller::here(), msg);
    }

    /// Formatted debug-level record.
    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.base.log_args(Level::Debug, Caller::here(), args);
    }

    /// Fatal record.
    #[track_caller]
    pub fn fatalln(&self, msg: impl Display) -> ! {
        self.base.fatal(&msg.to_string(), &[])
    }

    /// Used by the logging macros.
    #[doc(hidden)]
    #[track_caller]
    pub fn log_args(&self, level: Level, caller: Caller, args: fmt::Arguments<'_>) {
        self.base.log_args(level, caller, args);
    }

    #[track_caller]
    pub(crate) fn fatal_with_stack(&self, caller: Caller, msg: &str, stack: String) -> ! {
        self.base.fatal_with_stack(caller, msg, stack)
    }

    pub fn sync(&self) {
        self.base.sync();
    }

    #[track_caller]
    fn emit(&self, level: Level, caller: Caller, msg: impl Display) {
        self.emitw(level, caller, msg, &[]);
    }

    // formatting is skipped for disabled non-terminal levels
    #[track_caller]
    fn emitw(&self, level: Level, caller: Caller, msg: impl Display, fields: &[Field]) {
        if !self.base.enabled(level) && level < Level::DPanic {
            return;
        }
        self.base.log(level, caller, &msg.to_string(), fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;
    use crate::core::hook::PanicHook;
    use crate::core::sink::MemoryWriter;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn sugared(config: LoggingConfig) -> (SugaredLogger, MemoryWriter) {
        let out = MemoryWriter::new();
        let logger = Logger::builder(config)
            .writer(out.clone())
            .error_writer(MemoryWriter::new())
            .fatal_hook(PanicHook)
            .build()
            .unwrap();
        (logger.sugar(), out)
    }

    #[test]
    fn test_with_takes_loose_values() {
        let (log, out) = sugared(LoggingConfig::production());

        log.with("attempt", 3)
            .with("tags", ["a", "b"])
            .with_correlation_id(&"c-1")
            .info("retrying");

        let record = &out.records()[0];
        assert_eq!(record["attempt"], 3);
        assert_eq!(record["tags"], serde_json::json!(["a", "b"]));
        assert_eq!(record["correlation_id"], "c-1");
        assert_eq!(record["msg"], "retrying");
    }

    #[test]
    fn test_print_shims_are_debug_level() {
        let (log, out) = sugared(LoggingConfig::development());

        log.print("one");
        log.println(2);
        log.printf(format_args!("{}-{}", "three", 3));

        let records = out.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r["level"] == "debug"));
        assert_eq!(records[1]["msg"], "2");
        assert_eq!(records[2]["msg"], "three-3");
    }

    #[test]
    fn test_print_shims_hidden_in_production() {
        let (log, out) = sugared(LoggingConfig::production());

        log.print("noise");

        assert!(out.records().is_empty());
    }

    #[test]
    fn test_fatalln_is_fatal() {
        let (log, out) = sugared(LoggingConfig::production());

        let result = catch_unwind(AssertUnwindSafe(|| log.fatalln("bye")));

        assert!(result.is_err());
        assert_eq!(out.records()[0]["level"], "fatal");
    }

    #[test]
    fn test_desugar_keeps_fields() {
        let (log, out) = sugared(LoggingConfig::production());

        log.with("op", "sync").desugar().info("done", &[]);

        assert_eq!(out.records()[0]["op"], "sync");
    }

    #[test]
    fn test_infow_adds_call_fields() {
        let (log, out) = sugared(LoggingConfig::production());

        log.with("op", "sync")
            .infow("batch done", &[Field::uint("rows", 12)]);
        log.infow("second", &[]);

        let records = out.records();
        assert_eq!(records[0]["op"], "sync");
        assert_eq!(records[0]["rows"], 12);
        assert!(records[1].get("rows").is_none());
    }

    #[test]
    fn test_development_names_enclosing_function() {
        let (log, out) = sugared(LoggingConfig::development());

        log.warnw("slow query", &[Field::uint("ms", 900)]);

        let record = &out.records()[0];
        assert!(record["func"]
            .as_str()
            .unwrap()
            .ends_with("test_development_names_enclosing_function"));
    }

    #[test]
    fn test_errorf_formats() {
        let (log, out) = sugared(LoggingConfig::production());

        log.errorf(format_args!("failed after {} attempts", 5));

        let record = &out.records()[0];
        assert_eq!(record["level"], "error");
        assert_eq!(record["msg"], "failed after 5 attempts");
    }
}
