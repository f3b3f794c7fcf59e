//! Operator strategies.
//!
//! A strategy pairs an operator token (`"$gt"`) with the clause it adds to a
//! [`QueryHandle`]. Built-in operators are the closed [`Operator`] enum;
//! anything else implements [`Strategy`] and is registered on a
//! [`Registry`](crate::Registry).
//!
//! | Token | Clause | Several values |
//! |-------|--------|----------------|
//! | `$eq` | `=` / `IS NULL` | OR-ed, one grouped clause |
//! | `$ne` | `!=` / `IS NOT NULL` | AND-ed, one clause each |
//! | `$gt` `$gte` `$lt` `$lte` | `>` `>=` `<` `<=` | AND-ed, one clause each, no `null` |
//! | `$in` `$nin` | `IN` / `NOT IN` | the whole set |
//! | `$like` `$ilike` | `LIKE` / `ILIKE` | AND-ed, strings only |
//! | `$startsWith` `$endsWith` `$contains` | `LIKE` with `%` | AND-ed, strings only |
//! | `$between` | `BETWEEN` | exactly 2 |
//! | `$null` `$notNull` | `IS NULL` / `IS NOT NULL` | exactly 1 bool |

mod builtin;

use std::fmt;

use crate::error::Result;
use crate::query::QueryHandle;
use crate::Value;

/// A filter operator: a token plus the clause it applies.
///
/// Implementations are stateless and shared read-only between invocations,
/// hence the `Send + Sync` bound.
///
/// # Example
///
/// ```
/// use mik_filter::{Comparison, FilterError, QueryHandle, Result, Strategy, Value};
///
/// /// `$before`: strictly earlier than every given timestamp.
/// #[derive(Debug)]
/// struct Before;
///
/// impl Strategy for Before {
///     fn token(&self) -> &str {
///         "$before"
///     }
///
///     fn apply(&self, query: &mut dyn QueryHandle, column: &str, values: &[Value]) -> Result<()> {
///         if values.is_empty() {
///             return Err(FilterError::malformed(column, "`$before` expects a value"));
///         }
///         for value in values {
///             query.where_cmp(column, Comparison::Lt, value.clone());
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Strategy: Send + Sync + fmt::Debug {
    /// Operator token as written in a filter, including the `$`.
    fn token(&self) -> &str;

    /// Add this operator's clause for `column` to `query`.
    ///
    /// `values` holds one entry for a scalar filter value and one entry per
    /// element for a list. Arity and type checks must happen before the
    /// query is touched, so a rejected filter leaves it unchanged.
    fn apply(&self, query: &mut dyn QueryHandle, column: &str, values: &[Value]) -> Result<()>;
}

/// Built-in operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Operator {
    /// `$eq`, also the implicit operator for bare values.
    Eq,
    /// `$ne`
    Ne,
    /// `$gt`
    Gt,
    /// `$gte`
    Gte,
    /// `$lt`
    Lt,
    /// `$lte`
    Lte,
    /// `$in`
    In,
    /// `$nin`
    NotIn,
    /// `$like`
    Like,
    /// `$ilike`
    ILike,
    /// `$startsWith`
    StartsWith,
    /// `$endsWith`
    EndsWith,
    /// `$contains`
    Contains,
    /// `$between`
    Between,
    /// `$null`
    Null,
    /// `$notNull`
    NotNull,
}

impl Operator {
    /// Every built-in operator, in documentation order.
    pub const ALL: [Self; 16] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::In,
        Self::NotIn,
        Self::Like,
        Self::ILike,
        Self::StartsWith,
        Self::EndsWith,
        Self::Contains,
        Self::Between,
        Self::Null,
        Self::NotNull,
    ];

    /// The operator's token, including the `$`.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Ne => "$ne",
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
            Self::In => "$in",
            Self::NotIn => "$nin",
            Self::Like => "$like",
            Self::ILike => "$ilike",
            Self::StartsWith => "$startsWith",
            Self::EndsWith => "$endsWith",
            Self::Contains => "$contains",
            Self::Between => "$between",
            Self::Null => "$null",
            Self::NotNull => "$notNull",
        }
    }

    /// Look up a built-in operator by its exact token.
    ///
    /// ```
    /// use mik_filter::Operator;
    ///
    /// assert_eq!(Operator::from_token("$gte"), Some(Operator::Gte));
    /// assert_eq!(Operator::from_token("gte"), None);
    /// assert_eq!(Operator::from_token("$unknown"), None);
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Strategy for Operator {
    fn token(&self) -> &str {
        Self::token(*self)
    }

    fn apply(&self, query: &mut dyn QueryHandle, column: &str, values: &[Value]) -> Result<()> {
        builtin::apply(*self, query, column, values)
    }
}
