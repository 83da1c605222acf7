//! Process-wide correlation ID keys.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

/// Default for both the context key and the record field key.
pub const DEFAULT_CORRELATION_KEY: &str = "correlation_id";

static FIELD_KEY: LazyLock<ArcSwap<String>> =
    LazyLock::new(|| ArcSwap::from_pointee(DEFAULT_CORRELATION_KEY.to_string()));

static CONTEXT_KEY: LazyLock<ArcSwap<String>> =
    LazyLock::new(|| ArcSwap::from_pointee(DEFAULT_CORRELATION_KEY.to_string()));

/// Set the record key correlation IDs are emitted under. Empty keys are ignored.
pub fn set_correlation_id_field_key(key: &str) {
    if key.is_empty() {
        return;
    }
    FIELD_KEY.store(Arc::new(key.to_string()));
}

/// Set the [`Context`](crate::Context) key correlation IDs are read from.
/// Empty keys are ignored.
pub fn set_correlation_id_context_key(key: &str) {
    if key.is_empty() {
        return;
    }
    CONTEXT_KEY.store(Arc::new(key.to_string()));
}

pub fn correlation_id_field_key() -> Arc<String> {
    FIELD_KEY.load_full()
}

pub fn correlation_id_context_key() -> Arc<String> {
    CONTEXT_KEY.load_full()
}
