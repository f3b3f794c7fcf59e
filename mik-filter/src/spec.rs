//! The caller-supplied filter mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::constants::DEFAULT_FILTERS_KEY;
use crate::error::{FilterError, Result};

/// Ordered mapping of field name to filter expression.
///
/// A field maps to a bare value (`"active"`), a list (`["a", "b"]`), or an
/// object of operator tokens (`{"$gt": 18, "$lt": 65}`). Field and operator
/// order is the order the caller wrote them in, and is the order clauses are
/// applied in.
///
/// ```
/// use mik_filter::FilterSpec;
///
/// let spec = FilterSpec::parse(r#"{"status": "active", "age": {"$gt": 18}}"#).unwrap();
/// let fields: Vec<&str> = spec.iter().map(|(field, _)| field.as_str()).collect();
/// assert_eq!(fields, ["status", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(Map<String, JsonValue>);

impl FilterSpec {
    /// An empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a spec from JSON text.
    pub fn parse(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)
            .map_err(|e| FilterError::malformed(DEFAULT_FILTERS_KEY, format!("invalid JSON: {e}")))?;
        Self::from_json(value)
    }

    /// Wrap a decoded JSON value, which must be an object.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        Self::from_json_at(DEFAULT_FILTERS_KEY, value)
    }

    /// Like [`from_json`](Self::from_json), naming `key` in the error.
    pub(crate) fn from_json_at(key: &str, value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(FilterError::malformed(
                key,
                format!("expected an object of field filters, got {}", json_kind(&other)),
            )),
        }
    }

    /// Add or replace the filter for `field`.
    ///
    /// A replaced field keeps its original position.
    pub fn insert(&mut self, field: impl Into<String>, filter: JsonValue) -> &mut Self {
        self.0.insert(field.into(), filter);
        self
    }

    /// Fields and their filter expressions, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    /// Number of filtered fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the spec filters nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, JsonValue>> for FilterSpec {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }
}

impl TryFrom<JsonValue> for FilterSpec {
    type Error = FilterError;

    fn try_from(value: JsonValue) -> Result<Self> {
        Self::from_json(value)
    }
}

pub(crate) const fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
