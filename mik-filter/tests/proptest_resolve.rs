//! Property tests for filter resolution.

use mik_filter::{
    Clause, Comparison, FilterError, FilterList, FilterSpec, Operator, Postgres, QueryHandle,
    Registry, Resolver, SelectQuery, Value, postgres,
};
use proptest::prelude::*;
use serde_json::{Map, Value as JsonValue, json};

fn apply(spec: FilterSpec) -> Result<SelectQuery<Postgres>, FilterError> {
    let registry = Registry::builtin();
    let list = FilterList::defaults(&registry)?;
    let mut query = postgres("t");
    Resolver::new(&list).apply_all(&mut query, &spec)?;
    Ok(query)
}

fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

proptest! {
    /// Arbitrary JSON never panics the resolver; it either applies or errors.
    #[test]
    fn resolve_doesnt_panic_on_arbitrary_json(input in ".*") {
        if let Ok(spec) = FilterSpec::parse(&input) {
            let _ = apply(spec);
        }
    }

    /// `{"$gt": [a, b, ...]}` adds one AND-ed clause per value, in order.
    #[test]
    fn comparison_lists_conjoin(values in prop::collection::vec(any::<i64>(), 1..8)) {
        let mut spec = FilterSpec::new();
        spec.insert("n", json!({"$gt": values}));
        let query = apply(spec).unwrap();

        let expected: Vec<Clause> = values
            .iter()
            .map(|v| {
                let mut q = postgres("t");
                q.where_cmp("n", Comparison::Gt, Value::Int(*v));
                q.clauses()[0].clone()
            })
            .collect();
        prop_assert_eq!(query.clauses(), &expected[..]);

        let result = query.build();
        prop_assert_eq!(result.sql.matches(" AND ").count(), values.len() - 1);
        prop_assert_eq!(result.params.len(), values.len());
    }

    /// A bare list is a single grouped OR clause.
    #[test]
    fn equality_lists_disjoin(values in prop::collection::vec("[a-z]{1,6}", 2..8)) {
        let mut spec = FilterSpec::new();
        spec.insert("s", json!(values));
        let result = apply(spec).unwrap().build();

        prop_assert!(!result.sql.contains(" AND "));
        prop_assert_eq!(result.sql.matches(" OR ").count(), values.len() - 1);
        let params: Vec<Value> = values.iter().map(|v| Value::from(v.as_str())).collect();
        prop_assert_eq!(result.params, params);
    }

    /// Clauses follow field order as written.
    #[test]
    fn field_order_is_preserved(
        fields in prop::collection::hash_set(field_name(), 1..8)
    ) {
        let mut map = Map::new();
        for (i, field) in fields.iter().enumerate() {
            map.insert(field.clone(), JsonValue::from(i));
        }
        let order: Vec<String> = map.keys().cloned().collect();
        let query = apply(FilterSpec::from(map)).unwrap();

        let columns: Vec<&str> = query.clauses().iter().map(Clause::column).collect();
        prop_assert_eq!(columns, order.iter().map(String::as_str).collect::<Vec<_>>());
    }

    /// An operator outside the allow-list is always rejected and adds nothing.
    #[test]
    fn disallowed_operators_are_rejected(
        allowed in prop::sample::subsequence(Operator::ALL.to_vec(), 1..Operator::ALL.len())
    ) {
        let registry = Registry::builtin();
        let tokens: Vec<&str> = allowed.iter().map(|op| op.token()).collect();
        let list = FilterList::only(&registry, Some(&tokens)).unwrap();

        for op in Operator::ALL.into_iter().filter(|op| !allowed.contains(op)) {
            let mut expr = Map::new();
            expr.insert(op.token().to_string(), json!(1));
            let mut query = postgres("t");
            let err = Resolver::new(&list)
                .apply(&mut query, "c", &JsonValue::Object(expr))
                .unwrap_err();
            let is_unknown = matches!(err, FilterError::UnknownOperator { .. });
            prop_assert!(is_unknown);
            prop_assert!(query.clauses().is_empty());
        }
    }
}
