//! SQL dialects for Postgres and `SQLite`.
//!
//! Each dialect owns the placeholder syntax and the clauses whose shape
//! differs between databases.

use crate::Value;

/// SQL dialect trait for database-specific syntax.
pub trait Dialect: Clone + Copy {
    /// Format a parameter placeholder (e.g., `$1` for Postgres, `?1` for `SQLite`).
    fn param(&self, idx: usize) -> String;

    /// Format an IN clause, returning the SQL fragment and the bound values.
    fn in_clause(&self, field: &str, values: &[Value], start_idx: usize) -> (String, Vec<Value>);

    /// Format a NOT IN clause.
    fn not_in_clause(
        &self,
        field: &str,
        values: &[Value],
        start_idx: usize,
    ) -> (String, Vec<Value>);

    /// Whether ILIKE is supported natively.
    fn supports_ilike(&self) -> bool;

    /// Format a STARTS WITH clause (e.g., `LIKE $1 || '%'`).
    fn starts_with_clause(&self, field: &str, idx: usize) -> String {
        format!("{field} LIKE {} || '%'", self.param(idx))
    }

    /// Format an ENDS WITH clause (e.g., `LIKE '%' || $1`).
    fn ends_with_clause(&self, field: &str, idx: usize) -> String {
        format!("{field} LIKE '%' || {}", self.param(idx))
    }

    /// Format a CONTAINS clause (e.g., `LIKE '%' || $1 || '%'`).
    fn contains_clause(&self, field: &str, idx: usize) -> String {
        format!("{field} LIKE '%' || {} || '%'", self.param(idx))
    }
}

/// Postgres dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    fn in_clause(&self, field: &str, values: &[Value], start_idx: usize) -> (String, Vec<Value>) {
        // One array parameter regardless of set size
        let sql = format!("{field} = ANY(${start_idx})");
        (sql, vec![Value::Array(values.to_vec())])
    }

    fn not_in_clause(
        &self,
        field: &str,
        values: &[Value],
        start_idx: usize,
    ) -> (String, Vec<Value>) {
        let sql = format!("{field} != ALL(${start_idx})");
        (sql, vec![Value::Array(values.to_vec())])
    }

    #[inline]
    fn supports_ilike(&self) -> bool {
        true
    }
}

/// `SQLite` dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Sqlite;

impl Sqlite {
    fn placeholders(values: &[Value], start_idx: usize) -> String {
        (0..values.len())
            .map(|i| format!("?{}", start_idx + i))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    fn in_clause(&self, field: &str, values: &[Value], start_idx: usize) -> (String, Vec<Value>) {
        let sql = format!("{field} IN ({})", Self::placeholders(values, start_idx));
        (sql, values.to_vec())
    }

    fn not_in_clause(
        &self,
        field: &str,
        values: &[Value],
        start_idx: usize,
    ) -> (String, Vec<Value>) {
        let sql = format!("{field} NOT IN ({})", Self::placeholders(values, start_idx));
        (sql, values.to_vec())
    }

    #[inline]
    fn supports_ilike(&self) -> bool {
        // SQLite LIKE is case-insensitive for ASCII by default
        false
    }
}
