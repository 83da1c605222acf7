//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};

use corrlog::{LoggerBuilder, LoggingConfig, MemoryWriter, PanicHook};

/// Captured output of a logger under test.
pub struct Captured {
    pub out: MemoryWriter,
    pub err: MemoryWriter,
}

impl Captured {
    pub fn new() -> Self {
        Self {
            out: MemoryWriter::new(),
            err: MemoryWriter::new(),
        }
    }

    /// Builder writing into this capture, with a fatal hook that panics
    /// instead of exiting the test process.
    pub fn builder(&self, config: LoggingConfig) -> LoggerBuilder {
        LoggerBuilder::new(config)
            .writer(self.out.clone())
            .error_writer(self.err.clone())
            .fatal_hook(PanicHook)
    }

    pub fn records_with_msg(&self, msg: &str) -> Vec<serde_json::Value> {
        self.out
            .records()
            .into_iter()
            .filter(|r| r["msg"] == msg)
            .collect()
    }
}

/// A listener holding a local port, so binding it again fails.
pub fn occupied_port() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}
