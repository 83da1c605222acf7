//! Request-scoped metadata bag.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::logger::correlation_str;
use crate::logger::keys::correlation_id_context_key;

type Value = Arc<dyn Any + Send + Sync>;

/// Immutable string-keyed bag of values carried alongside a request.
///
/// Deriving a context with [`with_value`](Context::with_value) returns a new
/// bag; the original is unchanged. Clones are cheap.
#[derive(Clone, Default)]
pub struct Context {
    values: Arc<HashMap<String, Value>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new context with `key` bound to `value`.
    pub fn with_value<T>(&self, key: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        let mut values = (*self.values).clone();
        values.insert(key.into(), Arc::new(value));
        Self {
            values: Arc::new(values),
        }
    }

    /// A new context carrying `id` under the current correlation context key.
    pub fn with_correlation_id(&self, id: impl Into<String>) -> Self {
        self.with_value(correlation_id_context_key().as_str(), id.into())
    }

    pub fn value(&self, key: &str) -> Option<&(dyn Any + Send + Sync)> {
        self.values.get(key).map(|v| &**v)
    }

    /// The correlation ID, if one is present and is a `String` or `&'static str`.
    pub fn correlation_id(&self) -> Option<&str> {
        self.value(correlation_id_context_key().as_str())
            .and_then(|v| correlation_str(v))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Fresh random correlation ID (UUID v4).
pub fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_value_does_not_mutate_receiver() {
        let base = Context::new().with_value("tenant", "acme".to_string());
        let derived = base.with_value("region", 3u8);

        assert!(base.value("region").is_none());
        assert_eq!(derived.value("region").unwrap().downcast_ref::<u8>(), Some(&3));
        assert_eq!(
            derived.value("tenant").unwrap().downcast_ref::<String>().map(String::as_str),
            Some("acme")
        );
    }

    #[test]
    fn test_correlation_id_round_trip() {
        let ctx = Context::new().with_correlation_id("abc-123");
        assert_eq!(ctx.correlation_id(), Some("abc-123"));
        assert_eq!(Context::new().correlation_id(), None);
    }

    #[test]
    fn test_correlation_id_accepts_static_str() {
        let key = correlation_id_context_key();
        let ctx = Context::new().with_value(key.as_str(), "static-id");
        assert_eq!(ctx.correlation_id(), Some("static-id"));

        let ctx = Context::new().with_value(key.as_str(), 42u32);
        assert_eq!(ctx.correlation_id(), None);
    }

    #[test]
    fn test_new_correlation_id_is_uuid() {
        let id = new_correlation_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_correlation_id());
    }
}
