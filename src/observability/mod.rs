//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! tracing::info!(...) in any crate
//!     → bridge.rs (TracingBridge layer, level-checked against the logger)
//!     → Logger::log (same encoder, sampler and sink as direct calls)
//! ```

pub mod bridge;

pub use bridge::{install_tracing_bridge, TracingBridge};
