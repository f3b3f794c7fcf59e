//! Turning filter expressions into strategy calls.
//!
//! | Expression | Conditions |
//! |------------|------------|
//! | `{"status": "active"}` | `status $eq ["active"]` |
//! | `{"id": [1, 2]}` | `id $eq [1, 2]` |
//! | `{"age": {"$gt": 18, "$lt": 65}}` | `age $gt [18]`, then `age $lt [65]` |
//! | `{"age": {"$gt": [18, 21]}}` | `age $gt [18, 21]` |

use serde_json::Value as JsonValue;

use crate::constants::OPERATOR_PREFIX;
use crate::error::{FilterError, Result};
use crate::query::QueryHandle;
use crate::registry::FilterList;
use crate::spec::{FilterSpec, json_kind};
use crate::strategy::{Operator, Strategy};
use crate::Value;

/// One `(column, operator, values)` triple extracted from a filter.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Condition {
    /// Filtered field.
    pub column: String,
    /// Operator token, `$eq` for the bare-value forms.
    pub token: String,
    /// Operand values, at least one.
    pub values: Vec<Value>,
}

/// Applies filter expressions using the strategies of one [`FilterList`].
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    filters: &'a FilterList,
}

impl<'a> Resolver<'a> {
    /// Resolve against the operators enabled in `filters`.
    pub const fn new(filters: &'a FilterList) -> Self {
        Self { filters }
    }

    /// Split one field's expression into conditions, in input order.
    ///
    /// Only the shape is checked here; whether the operators are enabled is
    /// decided by [`apply`](Self::apply).
    ///
    /// ```
    /// use mik_filter::{Resolver, Value};
    /// use serde_json::json;
    ///
    /// let conditions = Resolver::parse("age", &json!({"$gt": 18, "$lt": 65})).unwrap();
    /// assert_eq!(conditions[0].token, "$gt");
    /// assert_eq!(conditions[1].values, vec![Value::Int(65)]);
    /// ```
    pub fn parse(field: &str, value: &JsonValue) -> Result<Vec<Condition>> {
        if field.is_empty() {
            return Err(FilterError::malformed(field, "field name cannot be empty"));
        }

        let JsonValue::Object(ops) = value else {
            let token = Operator::Eq.token();
            return Ok(vec![Condition {
                column: field.to_string(),
                token: token.to_string(),
                values: values_of(field, token, value)?,
            }]);
        };

        if ops.is_empty() {
            return Err(FilterError::malformed(field, "operator object cannot be empty"));
        }

        ops.iter()
            .map(|(token, sub)| {
                if !token.starts_with(OPERATOR_PREFIX) {
                    return Err(FilterError::malformed(
                        field,
                        format!("`{token}` is not an operator, nested field filters are not supported"),
                    ));
                }
                Ok(Condition {
                    column: field.to_string(),
                    token: token.clone(),
                    values: values_of(field, token, sub)?,
                })
            })
            .collect()
    }

    /// Apply one field's expression to `query`.
    ///
    /// Every operator of the field is looked up before the first one is
    /// applied, so an unknown operator leaves the query untouched by this
    /// field. A strategy rejecting its values adds nothing itself, but
    /// operators of the field applied before it stay applied.
    ///
    /// Field names are not checked against SQL identifier rules here. A
    /// column [`SelectQuery`](crate::SelectQuery) cannot render safely,
    /// such as a table-qualified `user.name`, becomes a clause matching no
    /// rows rather than an error, so the caller sees an empty result.
    ///
    /// # Errors
    ///
    /// - [`FilterError::MalformedFilter`] when the expression has an
    ///   unsupported shape or a strategy rejects its values.
    /// - [`FilterError::UnknownOperator`] when an operator is not enabled.
    pub fn apply(&self, query: &mut dyn QueryHandle, field: &str, value: &JsonValue) -> Result<()> {
        let conditions = Self::parse(field, value)?;

        let resolved = conditions
            .iter()
            .map(|condition| {
                self.filters
                    .get(&condition.token)
                    .map(|strategy| (strategy, condition))
                    .ok_or_else(|| FilterError::unknown_operator(field, &condition.token))
            })
            .collect::<Result<Vec<(&dyn Strategy, &Condition)>>>()?;

        for (strategy, condition) in resolved {
            tracing::trace!(
                column = %condition.column,
                operator = %condition.token,
                values = condition.values.len(),
                "applying filter condition"
            );
            strategy.apply(query, &condition.column, &condition.values)?;
        }
        Ok(())
    }

    /// Apply every field of `spec`, in order.
    ///
    /// Stops at the first error. Fields applied before it stay applied.
    pub fn apply_all(&self, query: &mut dyn QueryHandle, spec: &FilterSpec) -> Result<()> {
        for (field, value) in spec.iter() {
            self.apply(query, field, value)?;
        }
        Ok(())
    }
}

/// Values of one operator: a scalar becomes a single value, a list one
/// value per element.
fn values_of(field: &str, token: &str, value: &JsonValue) -> Result<Vec<Value>> {
    let scalar = |json: &JsonValue| {
        Value::from_json_scalar(json).ok_or_else(|| {
            FilterError::malformed(
                field,
                format!("`{token}` expects scalar values, got {}", scalar_kind(json)),
            )
        })
    };

    match value {
        JsonValue::Array(items) => items.iter().map(scalar).collect(),
        other => scalar(other).map(|v| vec![v]),
    }
}

fn scalar_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Number(_) => "an out-of-range integer",
        other => json_kind(other),
    }
}
