//! Error types for query set resolution.
//!
//! The resolution engine itself never invents failures: every variant here is
//! raised either by a collaborating relation (unknown scope, unresolvable column,
//! database failure) or by configuration and input parsing at the edges.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Unknown scope '{name}' on {table}")]
    UnknownScope { name: String, table: String },
    #[error("Unknown query set: {0}")]
    UnknownQuerySet(String),
    #[error("Unknown column '{column}' on {table}")]
    UnknownColumn { column: String, table: String },
    #[error("Ambiguous column '{column}' matches {candidates:?}")]
    AmbiguousColumn {
        column: String,
        candidates: Vec<String>,
    },
    #[error("Unsupported condition: {0}")]
    UnsupportedCondition(String),
    #[error("Invalid query parameters: {0}")]
    InvalidParams(String),
    #[error("Scope error: {0}")]
    ScopeError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl QueryError {
    /// Convenience constructor for failures raised inside user-supplied scope functions
    pub fn scope(message: impl Into<String>) -> Self {
        QueryError::ScopeError(message.into())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(error: serde_json::Error) -> Self {
        QueryError::ValidationError(format!("JSON serialization error: {error}"))
    }
}

impl From<config::ConfigError> for QueryError {
    fn from(error: config::ConfigError) -> Self {
        QueryError::ConfigurationError(error.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        QueryError::DatabaseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::UnknownScope {
            name: "by_company".to_string(),
            table: "users".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown scope 'by_company' on users");

        let err = QueryError::AmbiguousColumn {
            column: "name".to_string(),
            candidates: vec!["users.name".to_string(), "employers.name".to_string()],
        };
        assert!(err.to_string().contains("users.name"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: QueryError = parse_err.into();
        assert!(matches!(err, QueryError::ValidationError(_)));
    }
}
