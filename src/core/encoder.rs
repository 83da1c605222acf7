//! JSON record encoding.
//!
//! One record is one JSON object terminated by a newline. Entry keys come
//! first in a fixed order (`ts`, `level`, `logger`, `caller`, `func`, `msg`),
//! then context fields in attachment order, then `stacktrace`.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::core::entry::Entry;
use crate::core::field::Field;

/// How the `caller` key is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerFormat {
    /// Path as recorded by the compiler.
    Full,
    /// Last directory and file name.
    Short,
}

/// Key names and formatting choices for encoded records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    /// `None` omits the function name entirely.
    pub function_key: Option<String>,
    pub message_key: String,
    pub stacktrace_key: String,
    pub caller_format: CallerFormat,
}

impl EncoderConfig {
    pub fn development() -> Self {
        Self {
            function_key: Some("func".to_string()),
            caller_format: CallerFormat::Full,
            ..Self::production()
        }
    }

    pub fn production() -> Self {
        Self {
            time_key: "ts".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            function_key: None,
            message_key: "msg".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            caller_format: CallerFormat::Short,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode one record into `buf`, newline included.
    pub fn encode(&self, entry: &Entry<'_>, fields: &[Field], buf: &mut Vec<u8>) -> serde_json::Result<()> {
        let cfg = &self.config;
        let mut obj = ObjectWriter::new(buf);

        let ts = entry.time.to_rfc3339_opts(SecondsFormat::Secs, true);
        obj.entry(&cfg.time_key, &ts)?;
        obj.entry(&cfg.level_key, entry.level.as_str())?;
        if let Some(name) = entry.logger_name {
            obj.entry(&cfg.name_key, name)?;
        }
        let caller = match cfg.caller_format {
            CallerFormat::Full => entry.caller.full_path(),
            CallerFormat::Short => entry.caller.short_path(),
        };
        obj.entry(&cfg.caller_key, &caller)?;
        if let (Some(key), Some(function)) = (&cfg.function_key, entry.function) {
            obj.entry(key, function)?;
        }
        obj.entry(&cfg.message_key, entry.message)?;

        for field in fields {
            obj.entry(field.key(), field.value())?;
        }

        if let Some(stack) = entry.stack {
            obj.entry(&cfg.stacktrace_key, stack)?;
        }

        obj.finish()
    }
}

struct ObjectWriter<'a> {
    buf: &'a mut Vec<u8>,
    first: bool,
}

impl<'a> ObjectWriter<'a> {
    fn new(buf: &'a mut Vec<u8>) -> Self {
        buf.push(b'{');
        Self { buf, first: true }
    }

    fn entry<V: Serialize + ?Sized>(&mut self, key: &str, value: &V) -> serde_json::Result<()> {
        if !self.first {
            self.buf.push(b',');
        }
        self.first = false;
        serde_json::to_writer(&mut *self.buf, key)?;
        self.buf.push(b':');
        serde_json::to_writer(&mut *self.buf, value)
    }

    fn finish(self) -> serde_json::Result<()> {
        let buf = self.buf;
        buf.extend_from_slice(b"}\n");
        Ok(())
    }
}
