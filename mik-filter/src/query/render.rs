//! Rendering recorded clauses to SQL fragments.

use super::dialect::Dialect;
use super::{Clause, Comparison};
use crate::Value;
use crate::validate::is_valid_sql_identifier;

/// Fragment that matches no rows.
const NO_ROWS: &str = "1=0";

/// Render one clause starting at placeholder `start_idx`.
///
/// Returns the SQL fragment, the values it binds, and the next free
/// placeholder index.
pub(super) fn build_clause<D: Dialect>(
    dialect: &D,
    clause: &Clause,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let field = clause.column();
    if !is_valid_sql_identifier(field) {
        // Filter columns come from user input; never splice them into SQL
        tracing::warn!(
            column = field,
            "filter column is not a valid SQL identifier, clause matches no rows"
        );
        return (NO_ROWS.to_string(), vec![], start_idx);
    }

    match clause {
        Clause::Compare { op, value, .. } => build_comparison(dialect, field, *op, value, start_idx),

        Clause::Any { op, values, .. } => {
            let mut idx = start_idx;
            let mut params = Vec::new();
            let mut parts = Vec::with_capacity(values.len());
            for value in values {
                let (sql, new_params, new_idx) = build_comparison(dialect, field, *op, value, idx);
                parts.push(sql);
                params.extend(new_params);
                idx = new_idx;
            }
            let sql = match parts.len() {
                0 => NO_ROWS.to_string(),
                1 => parts.remove(0),
                _ => format!("({})", parts.join(" OR ")),
            };
            (sql, params, idx)
        },

        // An empty set matches nothing, and excluding nothing keeps everything
        Clause::In { values, negated, .. } if values.is_empty() => {
            let sql = if *negated { "1=1" } else { NO_ROWS };
            (sql.to_string(), vec![], start_idx)
        },
        Clause::In {
            values, negated, ..
        } => {
            let (sql, params) = if *negated {
                dialect.not_in_clause(field, values, start_idx)
            } else {
                dialect.in_clause(field, values, start_idx)
            };
            let new_idx = start_idx + params.len();
            (sql, params, new_idx)
        },

        Clause::Null { negated, .. } => {
            let sql = if *negated {
                format!("{field} IS NOT NULL")
            } else {
                format!("{field} IS NULL")
            };
            (sql, vec![], start_idx)
        },

        Clause::Between { low, high, .. } => {
            let sql = format!(
                "{} BETWEEN {} AND {}",
                field,
                dialect.param(start_idx),
                dialect.param(start_idx + 1)
            );
            (sql, vec![low.clone(), high.clone()], start_idx + 2)
        },
    }
}

fn build_comparison<D: Dialect>(
    dialect: &D,
    field: &str,
    op: Comparison,
    value: &Value,
    idx: usize,
) -> (String, Vec<Value>, usize) {
    let sql = match (op, value) {
        // NULL handling
        (Comparison::Eq, Value::Null) => return (format!("{field} IS NULL"), vec![], idx),
        (Comparison::Ne, Value::Null) => return (format!("{field} IS NOT NULL"), vec![], idx),

        (Comparison::ILike, _) if !dialect.supports_ilike() => {
            format!("{} LIKE {}", field, dialect.param(idx))
        },
        (Comparison::StartsWith, _) => dialect.starts_with_clause(field, idx),
        (Comparison::EndsWith, _) => dialect.ends_with_clause(field, idx),
        (Comparison::Contains, _) => dialect.contains_clause(field, idx),

        (op, _) => format!("{} {} {}", field, op.symbol(), dialect.param(idx)),
    };
    (sql, vec![value.clone()], idx + 1)
}
