#![allow(dead_code)]

use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for generating record names
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,9}"
}

/// Strategy for generating user rows: (name, income, active)
pub fn user_rows_strategy() -> impl Strategy<Value = Vec<(String, i64, bool)>> {
    prop::collection::vec((name_strategy(), 0i64..5, any::<bool>()), 0..20)
}

/// Strategy for generating blank parameter values
pub fn blank_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!("")),
        "[ \t]{1,4}".prop_map(Value::String),
        Just(json!([])),
    ]
}
