//! Filter values and their conversion from JSON.

use serde_json::Value as JsonValue;

/// A value carried by a filter condition and bound as a query parameter.
///
/// Values decoded from a filter are always scalars. `Array` only appears as
/// a bound parameter, e.g. the single array parameter of Postgres
/// `= ANY($1)`.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::exhaustive_enums)] // Mirrors the JSON scalar set
pub enum Value {
    /// SQL `NULL`
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Text
    String(String),
    /// Array parameter
    Array(Vec<Value>),
}

impl Value {
    /// Convert a JSON scalar into a filter value.
    ///
    /// Returns `None` for arrays, objects, and unsigned integers that do not
    /// fit in an `i64`.
    ///
    /// # Example
    ///
    /// ```
    /// use mik_filter::Value;
    /// use serde_json::json;
    ///
    /// assert_eq!(Value::from_json_scalar(&json!(42)), Some(Value::Int(42)));
    /// assert_eq!(Value::from_json_scalar(&json!("a")), Some(Value::String("a".into())));
    /// assert_eq!(Value::from_json_scalar(&json!([1, 2])), None);
    /// ```
    #[must_use]
    pub fn from_json_scalar(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::Null => Some(Self::Null),
            JsonValue::Bool(b) => Some(Self::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else if n.is_u64() {
                    None
                } else {
                    n.as_f64().map(Self::Float)
                }
            },
            JsonValue::String(s) => Some(Self::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    /// Short type name used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
        }
    }

    /// Whether this value is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
