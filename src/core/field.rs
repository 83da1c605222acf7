//! Typed key/value fields attached to records.

use serde::Serialize;
use serde_json::Value;

/// A single structured field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, value)
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, value)
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, value)
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, value)
    }

    pub fn strings<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|s| Value::String(s.into()))
            .collect::<Vec<_>>();
        Self::new(key, Value::Array(values))
    }

    /// Field under the `error` key holding the error's display text.
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::string("error", err.to_string())
    }

    /// Serialize an arbitrary value. Values that fail to serialize are
    /// recorded as a string describing the failure.
    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e)));
        Self::new(key, value)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Append `extra` to `base`, replacing the value of any key already present.
pub(crate) fn merge_fields<I>(base: &[Field], extra: I) -> Vec<Field>
where
    I: IntoIterator<Item = Field>,
{
    let mut merged = base.to_vec();
    for field in extra {
        match merged.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => existing.value = field.value,
            None => merged.push(field),
        }
    }
    merged
}
