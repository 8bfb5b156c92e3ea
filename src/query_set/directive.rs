//! Filter directives: the units a query set folds over its base relation.

use super::options::{QueryableOptions, ValueMapper};
use crate::config::ImplicitScopeArguments;
use crate::error::Result;
use crate::params::{is_blank, QueryParams};
use crate::query_builder::{Condition, WhereClause};
use crate::scopes::{Relation, ScopeRef};
use serde_json::Value;
use std::fmt;
use tracing::trace;

/// One step of a query set
pub enum FilterDirective<R> {
    /// Always applied, regardless of the parameters
    Scope(ScopeRef<R>),
    /// Applied when its expected parameter is present, defaulted or allowed blank
    Parameter(QueryableParameter<R>),
}

impl<R: Relation> FilterDirective<R> {
    pub fn apply(
        &self,
        relation: R,
        params: &QueryParams,
        implicit_arguments: ImplicitScopeArguments,
    ) -> Result<R> {
        match self {
            FilterDirective::Scope(scope) => {
                trace!(scope = ?scope, "applying unconditional scope");
                match implicit_arguments {
                    ImplicitScopeArguments::Empty => scope.apply(relation, None),
                    ImplicitScopeArguments::Params => {
                        scope.apply(relation, Some(&params.to_value()))
                    }
                }
            }
            FilterDirective::Parameter(parameter) => parameter.apply(relation, params),
        }
    }

    /// The parameter this directive watches, if any
    pub fn expected_parameter(&self) -> Option<&str> {
        match self {
            FilterDirective::Scope(_) => None,
            FilterDirective::Parameter(parameter) => Some(parameter.expected_parameter()),
        }
    }
}

impl<R> Clone for FilterDirective<R> {
    fn clone(&self) -> Self {
        match self {
            FilterDirective::Scope(scope) => FilterDirective::Scope(scope.clone()),
            FilterDirective::Parameter(parameter) => FilterDirective::Parameter(parameter.clone()),
        }
    }
}

impl<R> fmt::Debug for FilterDirective<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterDirective::Scope(scope) => f.debug_tuple("Scope").field(scope).finish(),
            FilterDirective::Parameter(parameter) => {
                f.debug_tuple("Parameter").field(parameter).finish()
            }
        }
    }
}

/// A parameter mapped to a scope or a column
pub struct QueryableParameter<R> {
    expected_parameter: String,
    column_name: String,
    scope: Option<ScopeRef<R>>,
    wildcard: bool,
    default_value: Option<Value>,
    allow_blank: bool,
    value_mapper: Option<ValueMapper>,
}

impl<R: Relation> QueryableParameter<R> {
    pub fn new(expected_parameter: impl Into<String>, options: QueryableOptions<R>) -> Self {
        let expected_parameter = expected_parameter.into();
        Self {
            column_name: options
                .column
                .unwrap_or_else(|| expected_parameter.clone()),
            expected_parameter,
            scope: options.scope,
            wildcard: options.wildcard,
            default_value: options.default,
            allow_blank: options.allow_blank,
            value_mapper: options.value_mapper,
        }
    }

    pub fn expected_parameter(&self) -> &str {
        &self.expected_parameter
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn allows_blank(&self) -> bool {
        self.allow_blank
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn apply(&self, relation: R, params: &QueryParams) -> Result<R> {
        let Some(raw_value) = self.queried_value(params) else {
            trace!(parameter = %self.expected_parameter, "parameter absent, skipping");
            return Ok(relation);
        };

        let value = match &self.value_mapper {
            Some(mapper) => mapper(raw_value),
            None => raw_value,
        };

        if let Some(scope) = &self.scope {
            trace!(
                parameter = %self.expected_parameter,
                scope = ?scope,
                "delegating to configured scope"
            );
            return scope.apply(relation, Some(&value));
        }

        if relation.has_scope(&self.expected_parameter) {
            trace!(parameter = %self.expected_parameter, "delegating to scope of the same name");
            return relation.apply_scope(&self.expected_parameter, Some(&value));
        }

        match self.condition_for(relation.table_name(), &value) {
            Some(clause) => {
                trace!(
                    parameter = %self.expected_parameter,
                    condition = %clause.to_sql(),
                    "filtering on column"
                );
                Ok(relation.where_clause(clause))
            }
            None => Ok(relation),
        }
    }

    /// The effective raw value, or `None` when the directive should be skipped.
    /// Blank values count as absent; `allow_blank` takes precedence over a default.
    fn queried_value(&self, params: &QueryParams) -> Option<Value> {
        match params.get(&self.expected_parameter) {
            Some(value) if !is_blank(value) => Some(value.clone()),
            _ if self.allow_blank => Some(Value::Null),
            _ => self.default_value.clone(),
        }
    }

    /// One clause per (flattened) value, OR-ed. `None` when there is nothing to match.
    fn condition_for(&self, table_name: &str, value: &Value) -> Option<WhereClause> {
        let field = qualified_column(table_name, &self.column_name);

        let mut values = Vec::new();
        flatten_into(value, &mut values);

        let conditions: Vec<Condition> = values
            .into_iter()
            .map(|value| match value {
                Value::Null => Condition::is_null(&field),
                value if self.wildcard => {
                    Condition::like(&field, &format!("%{}%", pattern_text(value)))
                }
                value => Condition::eq(&field, value.clone()),
            })
            .collect();

        if conditions.is_empty() {
            None
        } else {
            Some(WhereClause::or(conditions))
        }
    }
}

impl<R> Clone for QueryableParameter<R> {
    fn clone(&self) -> Self {
        Self {
            expected_parameter: self.expected_parameter.clone(),
            column_name: self.column_name.clone(),
            scope: self.scope.clone(),
            wildcard: self.wildcard,
            default_value: self.default_value.clone(),
            allow_blank: self.allow_blank,
            value_mapper: self.value_mapper.clone(),
        }
    }
}

impl<R> fmt::Debug for QueryableParameter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryableParameter")
            .field("expected_parameter", &self.expected_parameter)
            .field("column_name", &self.column_name)
            .field("scope", &self.scope)
            .field("wildcard", &self.wildcard)
            .field("default_value", &self.default_value)
            .field("allow_blank", &self.allow_blank)
            .finish_non_exhaustive()
    }
}

/// `table.column`, unless the column is already qualified
pub fn qualified_column(table_name: &str, column: &str) -> String {
    if column.contains('.') {
        column.to_string()
    } else {
        format!("{table_name}.{column}")
    }
}

fn flatten_into<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| flatten_into(item, out)),
        other => out.push(other),
    }
}

fn pattern_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
