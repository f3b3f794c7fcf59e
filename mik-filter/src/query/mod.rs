//! The query-handle contract strategies write to, plus a SQL implementation.
//!
//! Strategies never inspect a query. They only call the narrow mutation
//! methods on [`QueryHandle`], each of which adds one predicate that is
//! AND-ed with everything added before it.
//!
//! [`SelectQuery`] is the bundled implementation: it records each predicate
//! as a [`Clause`] and renders parameterized SQL for a [`Dialect`].

mod dialect;
mod render;
mod select;

pub use dialect::{Dialect, Postgres, Sqlite};
pub use select::{QueryResult, SelectQuery};

use crate::Value;

/// Comparison used by a single-column predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Comparison {
    /// Equal: `=`
    Eq,
    /// Not equal: `!=`
    Ne,
    /// Greater than: `>`
    Gt,
    /// Greater than or equal: `>=`
    Gte,
    /// Less than: `<`
    Lt,
    /// Less than or equal: `<=`
    Lte,
    /// Pattern match: `LIKE`
    Like,
    /// Case-insensitive pattern match: `ILIKE` (Postgres) or `LIKE` (`SQLite`)
    ILike,
    /// String starts with: `LIKE $1 || '%'`
    StartsWith,
    /// String ends with: `LIKE '%' || $1`
    EndsWith,
    /// String contains: `LIKE '%' || $1 || '%'`
    Contains,
}

impl Comparison {
    /// Operator symbol as it appears in a recorded clause.
    ///
    /// The pattern comparisons without a native SQL keyword use a
    /// descriptive name; dialects render those through their own clause
    /// builders.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
            Self::StartsWith => "STARTS WITH",
            Self::EndsWith => "ENDS WITH",
            Self::Contains => "CONTAINS",
        }
    }
}

/// Mutation contract a query object exposes to filter strategies.
///
/// Every method adds exactly one predicate, conjunctive with the predicates
/// already present. The trait is object safe so strategies can take
/// `&mut dyn QueryHandle`.
pub trait QueryHandle {
    /// `column <op> value`
    fn where_cmp(&mut self, column: &str, op: Comparison, value: Value);

    /// `(column <op> v1 OR column <op> v2 ...)` as one grouped predicate.
    fn where_any(&mut self, column: &str, op: Comparison, values: Vec<Value>);

    /// `column IN (values)`
    fn where_in(&mut self, column: &str, values: Vec<Value>);

    /// `column NOT IN (values)`
    fn where_not_in(&mut self, column: &str, values: Vec<Value>);

    /// `column IS NULL`
    fn where_null(&mut self, column: &str);

    /// `column IS NOT NULL`
    fn where_not_null(&mut self, column: &str);

    /// `column BETWEEN low AND high`
    fn where_between(&mut self, column: &str, low: Value, high: Value);
}

/// A predicate recorded by [`SelectQuery`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Clause {
    /// Single comparison.
    Compare {
        /// Constrained column.
        column: String,
        /// Comparison applied.
        op: Comparison,
        /// Bound operand.
        value: Value,
    },
    /// Disjunction of comparisons on one column.
    Any {
        /// Constrained column.
        column: String,
        /// Comparison applied to every value.
        op: Comparison,
        /// Operands, one OR-ed comparison each.
        values: Vec<Value>,
    },
    /// Set membership, `negated` for `NOT IN`.
    In {
        /// Constrained column.
        column: String,
        /// Members of the set.
        values: Vec<Value>,
        /// `NOT IN` when set.
        negated: bool,
    },
    /// Null check, `negated` for `IS NOT NULL`.
    Null {
        /// Constrained column.
        column: String,
        /// `IS NOT NULL` when set.
        negated: bool,
    },
    /// Inclusive range.
    Between {
        /// Constrained column.
        column: String,
        /// Lower bound.
        low: Value,
        /// Upper bound.
        high: Value,
    },
}

impl Clause {
    /// The column this clause constrains.
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Compare { column, .. }
            | Self::Any { column, .. }
            | Self::In { column, .. }
            | Self::Null { column, .. }
            | Self::Between { column, .. } => column,
        }
    }

    /// `(column, symbol, value)` view of a single comparison.
    ///
    /// Returns `None` for every other clause shape.
    #[must_use]
    pub fn as_comparison(&self) -> Option<(&str, &'static str, &Value)> {
        match self {
            Self::Compare { column, op, value } => Some((column, op.symbol(), value)),
            _ => None,
        }
    }
}
