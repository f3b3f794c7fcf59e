//! SELECT query handle.

use super::dialect::Dialect;
use super::render::build_clause;
use super::{Clause, Comparison, QueryHandle};
use crate::Value;
use crate::validate::assert_valid_sql_identifier;

/// Rendered SQL with its bound parameters.
#[derive(Debug)]
#[must_use = "QueryResult must be used to execute the query"]
#[non_exhaustive]
pub struct QueryResult {
    /// Parameterized SQL text.
    pub sql: String,
    /// Values for the placeholders, in placeholder order.
    pub params: Vec<Value>,
}

/// A SELECT query that filter strategies append predicates to.
///
/// Predicates are kept as [`Clause`]s in insertion order and rendered on
/// [`build`](Self::build), AND-ed together.
///
/// ```
/// use mik_filter::prelude::*;
///
/// let mut query = postgres("users").fields(&["id", "name"]);
/// query.where_cmp("age", Comparison::Gt, Value::Int(18));
///
/// let result = query.build();
/// assert_eq!(result.sql, "SELECT id, name FROM users WHERE age > $1");
/// ```
#[derive(Debug, Clone)]
pub struct SelectQuery<D: Dialect> {
    dialect: D,
    table: String,
    fields: Vec<String>,
    clauses: Vec<Clause>,
}

impl<D: Dialect> SelectQuery<D> {
    /// Create a new query for the given table.
    ///
    /// # Panics
    ///
    /// Panics if the table name is not a valid SQL identifier.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        let table = table.into();
        assert_valid_sql_identifier(&table, "table");
        Self {
            dialect,
            table,
            fields: Vec::new(),
            clauses: Vec::new(),
        }
    }

    /// Set the fields to SELECT. No fields selects `*`.
    ///
    /// # Panics
    ///
    /// Panics if any field name is not a valid SQL identifier.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        for field in fields {
            assert_valid_sql_identifier(field, "field");
        }
        self.fields = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Predicates recorded so far, in the order they were added.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// The table this query reads from.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Build the SQL query and parameters.
    pub fn build(&self) -> QueryResult {
        let select = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", select, self.table);
        let mut params = Vec::new();
        let mut param_idx = 1usize;

        if !self.clauses.is_empty() {
            let mut conditions = Vec::with_capacity(self.clauses.len());
            for clause in &self.clauses {
                let (condition, new_params, new_idx) =
                    build_clause(&self.dialect, clause, param_idx);
                conditions.push(condition);
                params.extend(new_params);
                param_idx = new_idx;
            }
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        QueryResult { sql, params }
    }
}

impl<D: Dialect> QueryHandle for SelectQuery<D> {
    fn where_cmp(&mut self, column: &str, op: Comparison, value: Value) {
        self.clauses.push(Clause::Compare {
            column: column.to_string(),
            op,
            value,
        });
    }

    fn where_any(&mut self, column: &str, op: Comparison, values: Vec<Value>) {
        self.clauses.push(Clause::Any {
            column: column.to_string(),
            op,
            values,
        });
    }

    fn where_in(&mut self, column: &str, values: Vec<Value>) {
        self.clauses.push(Clause::In {
            column: column.to_string(),
            values,
            negated: false,
        });
    }

    fn where_not_in(&mut self, column: &str, values: Vec<Value>) {
        self.clauses.push(Clause::In {
            column: column.to_string(),
            values,
            negated: true,
        });
    }

    fn where_null(&mut self, column: &str) {
        self.clauses.push(Clause::Null {
            column: column.to_string(),
            negated: false,
        });
    }

    fn where_not_null(&mut self, column: &str) {
        self.clauses.push(Clause::Null {
            column: column.to_string(),
            negated: true,
        });
    }

    fn where_between(&mut self, column: &str, low: Value, high: Value) {
        self.clauses.push(Clause::Between {
            column: column.to_string(),
            low,
            high,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Postgres, Sqlite};

    #[test]
    fn test_select_without_clauses() {
        let result = SelectQuery::new(Postgres, "users")
            .fields(&["id", "name", "email"])
            .build();

        assert_eq!(result.sql, "SELECT id, name, email FROM users");
        assert!(result.params.is_empty());
    }

    #[test]
    fn test_select_star() {
        let result = SelectQuery::new(Sqlite, "posts").build();
        assert_eq!(result.sql, "SELECT * FROM posts");
    }

    #[test]
    fn test_clauses_are_anded_in_order() {
        let mut query = SelectQuery::new(Postgres, "users").fields(&["id"]);
        query.where_cmp("status", Comparison::Eq, "active".into());
        query.where_cmp("age", Comparison::Gt, 18.into());
        query.where_null("deleted_at");

        let result = query.build();
        assert_eq!(
            result.sql,
            "SELECT id FROM users WHERE status = $1 AND age > $2 AND deleted_at IS NULL"
        );
        assert_eq!(result.params, vec![Value::from("active"), Value::Int(18)]);
    }

    #[test]
    fn test_param_numbering_across_in_clause_sqlite() {
        let mut query = SelectQuery::new(Sqlite, "users");
        query.where_in("role", vec!["admin".into(), "mod".into()]);
        query.where_between("age", 18.into(), 65.into());

        let result = query.build();
        assert_eq!(
            result.sql,
            "SELECT * FROM users WHERE role IN (?1, ?2) AND age BETWEEN ?3 AND ?4"
        );
        assert_eq!(result.params.len(), 4);
    }

    #[test]
    fn test_param_numbering_across_in_clause_postgres() {
        let mut query = SelectQuery::new(Postgres, "users");
        query.where_not_in("role", vec!["banned".into(), "ghost".into()]);
        query.where_cmp("age", Comparison::Lte, 99.into());

        let result = query.build();
        assert_eq!(
            result.sql,
            "SELECT * FROM users WHERE role != ALL($1) AND age <= $2"
        );
        assert_eq!(result.params.len(), 2);
    }

    #[test]
    fn test_records_clauses() {
        let mut query = SelectQuery::new(Postgres, "users");
        query.where_not_null("email");
        assert_eq!(
            query.clauses(),
            &[Clause::Null {
                column: "email".into(),
                negated: true
            }]
        );
        assert_eq!(query.table(), "users");
    }

    #[test]
    #[should_panic(expected = "Invalid SQL table name")]
    fn test_invalid_table_panics() {
        let _ = SelectQuery::new(Postgres, "users; DROP TABLE users");
    }
}
