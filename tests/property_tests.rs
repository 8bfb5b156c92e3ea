//! Property-based checks of query set resolution over generated tables.

mod common;

use common::*;
use proptest::prelude::*;
use queryable_with::memory::{MemoryRelation, MemoryTable};
use queryable_with::query_set::QueryableOptions;
use queryable_with::{QueryParams, QuerySet};
use serde_json::{json, Value};

fn table(rows: &[(String, i64, bool)]) -> MemoryTable {
    let mut table = MemoryTable::new("users");
    for (name, income, active) in rows {
        table
            .insert(json!({"name": name, "income": income, "active": active}))
            .unwrap();
    }
    table
}

fn ids(relation: &MemoryRelation) -> Vec<Value> {
    relation.pluck("id").unwrap()
}

fn search(table: &MemoryTable, wildcard: bool) -> QuerySet<MemoryRelation> {
    let mut set = QuerySet::new("search", table.relation());
    set.queryable_with(["name"], QueryableOptions::new().wildcard(wildcard))
        .queryable_with(["income", "active"], QueryableOptions::new());
    set
}

proptest! {
    #[test]
    fn empty_params_are_identity(rows in user_rows_strategy()) {
        let table = table(&rows);
        let result = search(&table, false).query(&QueryParams::new()).unwrap();
        prop_assert_eq!(ids(&result), ids(&table.relation()));
    }

    #[test]
    fn blank_values_are_identity(rows in user_rows_strategy(), blank in blank_value_strategy()) {
        let table = table(&rows);
        let params = QueryParams::new().with("name", blank.clone()).with("income", blank);
        let result = search(&table, false).query(&params).unwrap();
        prop_assert_eq!(result.count().unwrap(), rows.len());
    }

    #[test]
    fn parameters_compose_as_intersection(
        rows in user_rows_strategy(),
        income in 0i64..5,
        active in any::<bool>(),
    ) {
        let table = table(&rows);
        let set = search(&table, false);

        let both = set
            .query(&QueryParams::new().with("income", income).with("active", active))
            .unwrap();
        let expected = rows
            .iter()
            .filter(|(_, row_income, row_active)| *row_income == income && *row_active == active)
            .count();
        prop_assert_eq!(both.count().unwrap(), expected);

        // the same as narrowing one filter's result with the other
        let by_income = set.query(&QueryParams::new().with("income", income)).unwrap();
        let narrowed = set.query_on(by_income, &QueryParams::new().with("active", active)).unwrap();
        prop_assert_eq!(ids(&narrowed), ids(&both));
    }

    #[test]
    fn list_values_compose_as_union(
        rows in user_rows_strategy(),
        incomes in prop::collection::vec(0i64..5, 1..4),
    ) {
        let table = table(&rows);
        let result = search(&table, false)
            .query(&QueryParams::new().with("income", json!(incomes)))
            .unwrap();
        let expected = rows.iter().filter(|(_, income, _)| incomes.contains(income)).count();
        prop_assert_eq!(result.count().unwrap(), expected);
    }

    #[test]
    fn wildcard_matches_substrings(rows in user_rows_strategy(), needle in "[a-z]{1,3}") {
        let table = table(&rows);
        let result = search(&table, true)
            .query(&QueryParams::new().with("name", needle.as_str()))
            .unwrap();
        let expected: Vec<Value> = rows
            .iter()
            .filter(|(name, _, _)| name.to_ascii_lowercase().contains(&needle))
            .map(|(name, _, _)| json!(name))
            .collect();
        prop_assert_eq!(result.pluck("name").unwrap(), expected);
    }

    #[test]
    fn exact_match_finds_every_copy(
        rows in user_rows_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!rows.is_empty());
        let table = table(&rows);
        let name = &rows[pick.index(rows.len())].0;

        let result = search(&table, false)
            .query(&QueryParams::new().with("name", name.as_str()))
            .unwrap();
        let expected = rows.iter().filter(|(row_name, _, _)| row_name == name).count();
        prop_assert_eq!(result.count().unwrap(), expected);
    }
}
