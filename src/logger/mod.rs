//! Logger facade.
//!
//! # Responsibilities
//! - `Logger` (structured) and `SugaredLogger` (printf-style) handles
//! - Correlation ID attachment from a value or a request [`Context`]
//! - Process-wide correlation keys
//! - Building handles from [`LoggingConfig`](crate::config::LoggingConfig)
//!
//! Handles wrap a shared [`Core`](crate::core::Core) and never mutate it;
//! every `with*` call returns a fresh handle.

pub mod builder;
pub mod context;
pub mod keys;
pub mod structured;
pub mod sugared;

use std::any::Any;

use crate::core::field::Field;

pub use builder::{BuildError, LoggerBuilder};
pub use context::{new_correlation_id, Context};
pub use keys::{
    correlation_id_context_key, correlation_id_field_key, set_correlation_id_context_key,
    set_correlation_id_field_key, DEFAULT_CORRELATION_KEY,
};
pub use structured::Logger;
pub use sugared::SugaredLogger;

/// Correlation field for `value` when it holds a string.
pub(crate) fn correlation_field(value: &dyn Any) -> Option<Field> {
    let id = correlation_str(value)?;
    Some(Field::string(correlation_id_field_key().as_str(), id))
}

/// `value` as a correlation ID: a `String` or a `&'static str`.
pub(crate) fn correlation_str(value: &dyn Any) -> Option<&str> {
    value
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| value.downcast_ref::<&'static str>().copied())
}
