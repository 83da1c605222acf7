//! HTTP plumbing shared by the level endpoint and host services.
//!
//! # Data Flow
//! ```text
//! Request
//!     → correlation.rs (read or generate x-correlation-id, attach Context)
//!     → handler (logger.with_context_correlation_id(&ctx))
//!     → Response (x-correlation-id echoed)
//! ```

pub mod correlation;

pub use correlation::{correlation_middleware, X_CORRELATION_ID};
