//! Call-site and record metadata.

use std::panic::Location;

use chrono::{DateTime, Utc};

use crate::core::level::Level;

/// Source location of a logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
    /// Fully qualified function path, when the call site captured it.
    pub function: Option<&'static str>,
}

impl Caller {
    pub const fn new(file: &'static str, line: u32, function: Option<&'static str>) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Location of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn here() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line(), None)
    }

    /// Name of the function containing this call site, looked up in the
    /// current stack's debug info. `None` without debug info or when the
    /// call site is not on the current stack.
    pub fn resolve_function(&self) -> Option<String> {
        let mut found = None;
        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| {
                if found.is_some() {
                    return;
                }
                let at_call_site = symbol.lineno() == Some(self.line)
                    && symbol
                        .filename()
                        .is_some_and(|path| path.ends_with(self.file));
                if at_call_site {
                    found = symbol.name().map(|name| format!("{:#}", name));
                }
            });
            found.is_none()
        });
        found
    }

    /// `path/to/file.rs:line`
    pub fn full_path(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }

    /// Last directory and file name only, `dir/file.rs:line`.
    pub fn short_path(&self) -> String {
        let file = self.file.replace('\\', "/");
        let mut parts = file.rsplitn(3, '/');
        let name = parts.next().unwrap_or_default();
        match parts.next() {
            Some(dir) => format!("{}/{}:{}", dir, name, self.line),
            None => format!("{}:{}", name, self.line),
        }
    }
}

/// Everything about a record except its fields.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub logger_name: Option<&'a str>,
    pub message: &'a str,
    pub caller: Caller,
    /// Enclosing function of the call site, when known.
    pub function: Option<&'a str>,
    pub stack: Option<&'a str>,
}
