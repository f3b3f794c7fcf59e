//! Generated SQL executed against an in-memory `SQLite` database.

use mik_filter::prelude::*;
use rusqlite::Connection;
use rusqlite::types::Value as SqlValue;
use serde_json::json;

#[derive(Debug, Default)]
struct User {
    filters: FilterSlot,
}

impl Filterable for User {
    fn filter_slot(&self) -> &FilterSlot {
        &self.filters
    }

    fn filter_slot_mut(&mut self) -> &mut FilterSlot {
        &mut self.filters
    }
}

const NO_FILTERS: Option<[&str; 0]> = None;

fn seed() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            status TEXT NOT NULL,
            age INTEGER NOT NULL,
            admin INTEGER NOT NULL
        );
        INSERT INTO users VALUES (1, 'Ann', 'ann@example.com', 'active', 34, 1);
        INSERT INTO users VALUES (2, 'Bob', NULL, 'active', 17, 0);
        INSERT INTO users VALUES (3, 'Cid', 'cid@corp.io', 'banned', 52, 0);
        INSERT INTO users VALUES (4, 'Dee', 'dee@example.com', 'pending', 70, 0);
        INSERT INTO users VALUES (5, 'Eve', 'eve@corp.io', 'active', 25, 1);",
    )
    .unwrap();
    conn
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
        other => panic!("SQLite queries never bind {other:?}"),
    }
}

fn ids(conn: &Connection, result: &QueryResult) -> Vec<i64> {
    let mut stmt = conn.prepare(&result.sql).unwrap();
    let params = rusqlite::params_from_iter(result.params.iter().map(to_sql));
    let mut ids: Vec<i64> = stmt
        .query_map(params, |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    ids.sort_unstable();
    ids
}

fn select(conn: &Connection, filters: serde_json::Value) -> Vec<i64> {
    let registry = Registry::builtin();
    let ctx = FilterContext::new(&registry);
    let spec = FilterSpec::from_json(filters).unwrap();
    let query = User::default()
        .filter(&ctx, sqlite("users").fields(&["id"]), NO_FILTERS, Some(&spec))
        .unwrap();
    ids(conn, &query.build())
}

#[test]
fn implicit_equality() {
    let conn = seed();
    assert_eq!(select(&conn, json!({"status": "active"})), [1, 2, 5]);
}

#[test]
fn equality_list_matches_any() {
    let conn = seed();
    assert_eq!(select(&conn, json!({"status": ["banned", "pending"]})), [3, 4]);
}

#[test]
fn range_conjoins() {
    let conn = seed();
    assert_eq!(select(&conn, json!({"age": {"$gt": 18, "$lt": 60}})), [1, 3, 5]);
}

#[test]
fn comparison_list_conjoins() {
    let conn = seed();
    assert_eq!(select(&conn, json!({"age": {"$gte": [20, 30]}})), [1, 3, 4]);
}

#[test]
fn fields_conjoin() {
    let conn = seed();
    assert_eq!(
        select(&conn, json!({"status": "active", "age": {"$gte": 18}})),
        [1, 5]
    );
}

#[test]
fn set_membership() {
    let conn = seed();
    assert_eq!(select(&conn, json!({"id": {"$in": [2, 4, 9]}})), [2, 4]);
    assert_eq!(select(&conn, json!({"id": {"$nin": [2, 4]}})), [1, 3, 5]);
}

#[test]
fn string_patterns() {
    let conn = seed();
    assert_eq!(select(&conn, json!({"email": {"$endsWith": "@corp.io"}})), [3, 5]);
    assert_eq!(select(&conn, json!({"name": {"$startsWith": "D"}})), [4]);
    assert_eq!(select(&conn, json!({"email": {"$contains": "example"}})), [1, 4]);
    assert_eq!(select(&conn, json!({"name": {"$like": "_v_"}})), [5]);
    assert_eq!(select(&conn, json!({"name": {"$ilike": "ann"}})), [1]);
}

#[test]
fn between_is_inclusive() {
    let conn = seed();
    assert_eq!(select(&conn, json!({"age": {"$between": [25, 52]}})), [1, 3, 5]);
}

#[test]
fn null_checks() {
    let conn = seed();
    assert_eq!(select(&conn, json!({"email": null})), [2]);
    assert_eq!(select(&conn, json!({"email": {"$null": true}})), [2]);
    assert_eq!(select(&conn, json!({"email": {"$notNull": true}})), [1, 3, 4, 5]);
    assert_eq!(select(&conn, json!({"email": {"$ne": null}})), [1, 3, 4, 5]);
}

#[test]
fn booleans_bind_as_integers() {
    let conn = seed();
    assert_eq!(select(&conn, json!({"admin": true})), [1, 5]);
}

#[test]
fn invalid_column_matches_nothing() {
    let conn = seed();
    assert!(select(&conn, json!({"name; DROP TABLE users": "x"})).is_empty());
    assert_eq!(select(&conn, json!({})).len(), 5);
}

#[test]
fn allow_list_from_config() {
    let conn = seed();
    let config = FilterConfig::from_toml(r#"filters = ["$eq", "$in"]"#).unwrap();
    let registry = Registry::from_config(&config).unwrap();
    let ctx = FilterContext::new(&registry);

    let spec = FilterSpec::parse(r#"{"id": {"$in": [1, 3]}}"#).unwrap();
    let query = User::default()
        .filter(&ctx, sqlite("users").fields(&["id"]), NO_FILTERS, Some(&spec))
        .unwrap();
    assert_eq!(ids(&conn, &query.build()), [1, 3]);

    let spec = FilterSpec::parse(r#"{"age": {"$gt": 1}}"#).unwrap();
    let err = User::default()
        .filter(&ctx, sqlite("users"), NO_FILTERS, Some(&spec))
        .unwrap_err();
    assert!(matches!(err, FilterError::UnknownOperator { .. }));
}

#[test]
fn ambient_request_filters() {
    let conn = seed();
    let registry = Registry::builtin();
    let request = json!({"filters": {"status": {"$ne": "active"}}, "page": 1});
    let ctx = FilterContext::new(&registry).with_source(&request);

    let query = User::default()
        .filter(&ctx, sqlite("users").fields(&["id"]), NO_FILTERS, None)
        .unwrap();
    assert_eq!(ids(&conn, &query.build()), [3, 4]);
}
