//! # Query Parameters
//!
//! The caller-supplied mapping of parameter names to values that a query set is
//! reduced against. Keys are plain strings, so a parameter registered as `name`
//! is found whether the caller thought of it as a symbol or a string.

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed parameter mapping handed to [`QuerySet::query`](crate::query_set::QuerySet::query)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    values: Map<String, Value>,
}

impl QueryParams {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value. `null` is treated as an empty mapping; anything
    /// other than an object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(values) => Ok(Self { values }),
            other => Err(QueryError::InvalidParams(format!(
                "expected an object of parameters, got {other}"
            ))),
        }
    }

    /// Parse a JSON document into a parameter mapping
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Insert a parameter, returning the mapping for chaining
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The whole mapping as a JSON object, used when scopes receive the raw parameters
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

impl From<Map<String, Value>> for QueryParams {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Whether a parameter value counts as blank.
///
/// Null, empty or whitespace-only strings, empty lists and empty objects are
/// blank. `false` and numbers (including zero) never are.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_values() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("   \t")));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
    }

    #[test]
    fn test_false_and_zero_are_not_blank() {
        assert!(!is_blank(&json!(false)));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(0.0)));
        assert!(!is_blank(&json!(" x ")));
        assert!(!is_blank(&json!([null])));
    }

    #[test]
    fn test_from_value() {
        let params = QueryParams::from_value(json!({"name": "Guybrush"})).unwrap();
        assert_eq!(params.get("name"), Some(&json!("Guybrush")));

        assert!(QueryParams::from_value(Value::Null).unwrap().is_empty());
        assert!(matches!(
            QueryParams::from_value(json!(["name"])),
            Err(QueryError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_from_iterator_and_chaining() {
        let params: QueryParams = vec![("name", json!("Elaine")), ("active", json!(true))]
            .into_iter()
            .collect();
        assert_eq!(params.len(), 2);
        assert!(params.contains("active"));

        let params = QueryParams::new().with("income", 100).with("email", "a@b.c");
        assert_eq!(params.to_value(), json!({"income": 100, "email": "a@b.c"}));
    }

    #[test]
    fn test_serde_transparent() {
        let params: QueryParams = serde_json::from_str(r#"{"name": ["a", "b"]}"#).unwrap();
        assert_eq!(params.get("name"), Some(&json!(["a", "b"])));
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"name":["a","b"]}"#);
    }
}
