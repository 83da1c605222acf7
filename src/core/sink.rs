//! Record and error output.
//!
//! Sinks are [`MakeWriter`]s, the same abstraction `tracing-subscriber`'s fmt
//! layer writes through, so anything that works there (stdout, stderr,
//! `Mutex<File>`, `TestWriter`) works here.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

/// Where encoded records and logger-internal errors are written.
pub struct Sink {
    out: BoxMakeWriter,
    err: BoxMakeWriter,
}

impl Sink {
    pub fn new(out: BoxMakeWriter, err: BoxMakeWriter) -> Self {
        Self { out, err }
    }

    /// Records to stdout, internal errors to stderr.
    pub fn stdio() -> Self {
        Self::new(BoxMakeWriter::new(io::stdout), BoxMakeWriter::new(io::stderr))
    }

    /// Write one encoded record. Failures are reported on the error output.
    pub fn write_record(&self, record: &[u8]) {
        let mut writer = self.out.make_writer();
        if let Err(e) = writer.write_all(record) {
            self.report_error("write error", &e);
        }
    }

    /// Flush the record output.
    pub fn flush(&self) {
        if let Err(e) = self.out.make_writer().flush() {
            self.report_error("flush error", &e);
        }
    }

    /// One plain-text line on the error output. Errors writing it are dropped.
    pub fn report_error(&self, context: &str, err: &dyn std::fmt::Display) {
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut writer = self.err.make_writer();
        let _ = writeln!(writer, "{} logger {}: {}", ts, context, err);
        let _ = writer.flush();
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdio()
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

/// In-memory writer for capturing output, mostly in tests.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        // a panic while holding the lock cannot leave a partial record behind
        self.buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Each written line parsed as JSON. Lines that are not JSON are skipped.
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.contents()
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryWriter {
    type Writer = MemoryWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
