// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Operator tokens in docs read better bare
#![allow(clippy::module_name_repetitions)] // FilterError, FilterSpec, FilterList
#![allow(clippy::return_self_not_must_use)] // Builder methods return Self
#![allow(clippy::must_use_candidate)] // Fluent API doesn't need must_use
#![allow(clippy::match_same_arms)] // Operator tables read better unmerged
#![allow(clippy::format_push_string)] // String building style preference

//! # mik-filter - Mongo-style Filters for Data Models
//!
//! Lets a data model accept a mapping of field names to filter expressions
//! and turn it into parameterized SQL predicates. Every operator is a
//! [`Strategy`] looked up by token in a [`Registry`]; a model chooses which
//! operators it accepts per call or per instance.
//!
//! ## Quick Start
//!
//! ```
//! # use mik_filter::prelude::*;
//! let registry = Registry::builtin();
//! let list = FilterList::only(&registry, Some(["$eq", "$gt", "$lt"])).unwrap();
//! let spec = FilterSpec::parse(r#"{"status": "active", "age": {"$gt": 18, "$lt": 65}}"#).unwrap();
//!
//! let mut query = postgres("users").fields(&["id", "name"]);
//! Resolver::new(&list).apply_all(&mut query, &spec).unwrap();
//!
//! let result = query.build();
//! assert_eq!(
//!     result.sql,
//!     "SELECT id, name FROM users WHERE status = $1 AND age > $2 AND age < $3"
//! );
//! assert_eq!(result.params, vec![Value::from("active"), Value::Int(18), Value::Int(65)]);
//! ```
//!
//! ## Filter Expressions
//!
//! | Expression | Meaning |
//! |------------|---------|
//! | `"status": "active"` | `status = 'active'` |
//! | `"id": [1, 2]` | `id = 1 OR id = 2` |
//! | `"age": { "$gt": 18, "$lt": 65 }` | `age > 18 AND age < 65` |
//! | `"age": { "$gt": [18, 21] }` | `age > 18 AND age > 21` |
//!
//! ## Supported Operators
//!
//! | Operator | SQL | Example |
//! |----------|-----|---------|
//! | `$eq` | `=` | `"status": { "$eq": "active" }` |
//! | `$ne` | `!=` | `"status": { "$ne": "deleted" }` |
//! | `$gt` | `>` | `"age": { "$gt": 18 }` |
//! | `$gte` | `>=` | `"age": { "$gte": 21 }` |
//! | `$lt` | `<` | `"price": { "$lt": 100 }` |
//! | `$lte` | `<=` | `"price": { "$lte": 50 }` |
//! | `$in` | `IN` | `"status": { "$in": ["a", "b"] }` |
//! | `$nin` | `NOT IN` | `"status": { "$nin": ["x"] }` |
//! | `$like` | `LIKE` | `"name": { "$like": "%test%" }` |
//! | `$ilike` | `ILIKE` | `"name": { "$ilike": "%test%" }` |
//! | `$startsWith` | `LIKE $1 \|\| '%'` | `"name": { "$startsWith": "John" }` |
//! | `$endsWith` | `LIKE '%' \|\| $1` | `"email": { "$endsWith": "@example.com" }` |
//! | `$contains` | `LIKE '%' \|\| $1 \|\| '%'` | `"bio": { "$contains": "developer" }` |
//! | `$between` | `BETWEEN $1 AND $2` | `"age": { "$between": [18, 65] }` |
//! | `$null` | `IS NULL` | `"deleted_at": { "$null": true }` |
//! | `$notNull` | `IS NOT NULL` | `"email": { "$notNull": true }` |
//!
//! ## Models
//!
//! Implement [`Filterable`] to give a model a [`filter`](Filterable::filter)
//! method. Filters come from the call, or from the request-scoped
//! [`FilterSource`] wired into the [`FilterContext`].

mod config;
mod constants;
mod error;
mod filterable;
mod query;
mod registry;
mod resolve;
mod spec;
mod strategy;
mod validate;
mod value;

pub use config::FilterConfig;
pub use constants::{DEFAULT_FILTERS_KEY, OPERATOR_PREFIX};
pub use error::{FilterError, Result};
pub use filterable::{FilterContext, FilterSlot, FilterSource, Filterable};
pub use query::{
    Clause, Comparison, Dialect, Postgres, QueryHandle, QueryResult, SelectQuery, Sqlite,
};
pub use registry::{FilterList, Registry};
pub use resolve::{Condition, Resolver};
pub use spec::FilterSpec;
pub use strategy::{Operator, Strategy};
pub use validate::is_valid_sql_identifier;
pub use value::Value;

/// Build a filterable query for Postgres.
///
/// # Panics
///
/// Panics if `table` is not a valid SQL identifier.
#[must_use]
pub fn postgres(table: &str) -> SelectQuery<Postgres> {
    SelectQuery::new(Postgres, table)
}

/// Build a filterable query for `SQLite`.
///
/// # Panics
///
/// Panics if `table` is not a valid SQL identifier.
#[must_use]
pub fn sqlite(table: &str) -> SelectQuery<Sqlite> {
    SelectQuery::new(Sqlite, table)
}

/// Prelude module for convenient imports.
///
/// ```
/// use mik_filter::prelude::*;
/// let registry = Registry::builtin();
/// assert_eq!(registry.len(), Operator::ALL.len());
/// ```
pub mod prelude {
    pub use crate::{
        Clause, Comparison, Condition, Dialect, FilterConfig, FilterContext, FilterError,
        FilterList, FilterSlot, FilterSource, FilterSpec, Filterable, Operator, Postgres,
        QueryHandle, QueryResult, Registry, Resolver, SelectQuery, Sqlite, Strategy, Value,
        postgres, sqlite,
    };
}
