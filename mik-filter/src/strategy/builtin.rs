//! Clause application for the built-in operators.
//!
//! Equality OR-s its values into one grouped clause; every other
//! multi-value comparison adds one AND-ed clause per value.

use super::Operator;
use crate::error::{FilterError, Result};
use crate::query::{Comparison, QueryHandle};
use crate::Value;

pub(super) fn apply(
    op: Operator,
    query: &mut dyn QueryHandle,
    column: &str,
    values: &[Value],
) -> Result<()> {
    match op {
        Operator::Eq => {
            let first = require_some(op, column, values)?;
            if values.len() == 1 {
                query.where_cmp(column, Comparison::Eq, first.clone());
            } else {
                query.where_any(column, Comparison::Eq, values.to_vec());
            }
        },
        Operator::Ne => each(query, Comparison::Ne, op, column, values)?,
        Operator::Gt => each_ordered(query, Comparison::Gt, op, column, values)?,
        Operator::Gte => each_ordered(query, Comparison::Gte, op, column, values)?,
        Operator::Lt => each_ordered(query, Comparison::Lt, op, column, values)?,
        Operator::Lte => each_ordered(query, Comparison::Lte, op, column, values)?,

        Operator::In => {
            require_some(op, column, values)?;
            query.where_in(column, values.to_vec());
        },
        Operator::NotIn => {
            require_some(op, column, values)?;
            query.where_not_in(column, values.to_vec());
        },

        Operator::Like => each_pattern(query, Comparison::Like, op, column, values)?,
        Operator::ILike => each_pattern(query, Comparison::ILike, op, column, values)?,
        Operator::StartsWith => each_pattern(query, Comparison::StartsWith, op, column, values)?,
        Operator::EndsWith => each_pattern(query, Comparison::EndsWith, op, column, values)?,
        Operator::Contains => each_pattern(query, Comparison::Contains, op, column, values)?,

        Operator::Between => match values {
            [low, high] => query.where_between(column, low.clone(), high.clone()),
            _ => {
                return Err(FilterError::malformed(
                    column,
                    format!("`{op}` expects exactly 2 values, got {}", values.len()),
                ));
            },
        },

        Operator::Null | Operator::NotNull => {
            let is_null = match values {
                [Value::Bool(b)] => *b,
                _ => {
                    return Err(FilterError::malformed(
                        column,
                        format!("`{op}` expects a single boolean"),
                    ));
                },
            };
            // `$notNull: true` reads as `$null: false`
            if is_null == (op == Operator::Null) {
                query.where_null(column);
            } else {
                query.where_not_null(column);
            }
        },
    }
    Ok(())
}

fn require_some<'a>(op: Operator, column: &str, values: &'a [Value]) -> Result<&'a Value> {
    values
        .first()
        .ok_or_else(|| FilterError::malformed(column, format!("`{op}` expects at least one value")))
}

/// One AND-ed comparison per value.
fn each(
    query: &mut dyn QueryHandle,
    cmp: Comparison,
    op: Operator,
    column: &str,
    values: &[Value],
) -> Result<()> {
    require_some(op, column, values)?;
    for value in values {
        query.where_cmp(column, cmp, value.clone());
    }
    Ok(())
}

/// Like [`each`], but rejects `null` operands.
fn each_ordered(
    query: &mut dyn QueryHandle,
    cmp: Comparison,
    op: Operator,
    column: &str,
    values: &[Value],
) -> Result<()> {
    if values.iter().any(Value::is_null) {
        return Err(FilterError::malformed(
            column,
            format!("`{op}` cannot compare against null"),
        ));
    }
    each(query, cmp, op, column, values)
}

/// Like [`each`], but every value must be a string pattern.
fn each_pattern(
    query: &mut dyn QueryHandle,
    cmp: Comparison,
    op: Operator,
    column: &str,
    values: &[Value],
) -> Result<()> {
    if let Some(bad) = values.iter().find(|v| !matches!(v, Value::String(_))) {
        return Err(FilterError::malformed(
            column,
            format!("`{op}` expects string values, got {}", bad.kind()),
        ));
    }
    each(query, cmp, op, column, values)
}
