//! Declarative query set definitions, for query sets kept in JSON alongside
//! other application configuration rather than built in code.

use super::{QueryableOptions, QuerySet};
use crate::error::Result;
use crate::query_builder::WhereClause;
use crate::scopes::{Relation, ScopeRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters and unconditional scopes of one query set.
///
/// `scopes` and `parameters` suit sets where every scope should apply first.
/// `directives` keeps an explicit order and may mix both kinds:
///
/// ```json
/// {"directives": [{"names": ["name"], "fuzzy": true}, "active"]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySetDefinition {
    #[serde(default)]
    pub scopes: Vec<ScopeDefinition>,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    #[serde(default)]
    pub directives: Vec<DirectiveDefinition>,
}

/// One entry of an ordered directive list. Objects with `names` are parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveDefinition {
    Parameter(ParameterDefinition),
    Scope(ScopeDefinition),
}

/// An unconditional scope: a scope name, or a map of column equalities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeDefinition {
    Named(String),
    Conditions(Map<String, Value>),
}

/// One `queryable_with` registration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDefinition {
    pub names: Vec<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default, alias = "fuzzy")]
    pub wildcard: bool,
    #[serde(default)]
    pub allow_blank: bool,
}

impl QuerySetDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Register everything this definition describes on `set`: `scopes`, then
    /// `parameters`, then `directives` in their listed order
    pub fn apply_to<R: Relation>(&self, set: &mut QuerySet<R>) {
        for scope in &self.scopes {
            set.add_scope(scope.to_scope_ref());
        }
        for parameter in &self.parameters {
            parameter.register(set);
        }
        for directive in &self.directives {
            match directive {
                DirectiveDefinition::Parameter(parameter) => parameter.register(set),
                DirectiveDefinition::Scope(scope) => {
                    set.add_scope(scope.to_scope_ref());
                }
            }
        }
    }
}

impl ScopeDefinition {
    pub fn to_scope_ref<R>(&self) -> ScopeRef<R> {
        match self {
            ScopeDefinition::Named(name) => ScopeRef::Named(name.clone()),
            ScopeDefinition::Conditions(columns) => {
                ScopeRef::Conditions(WhereClause::from_equalities(columns))
            }
        }
    }
}

impl ParameterDefinition {
    fn register<R: Relation>(&self, set: &mut QuerySet<R>) {
        set.queryable_with(self.names.iter().cloned(), self.options());
    }

    pub fn options<R>(&self) -> QueryableOptions<R> {
        let mut options = QueryableOptions::new()
            .wildcard(self.wildcard)
            .allow_blank(self.allow_blank);
        if let Some(scope) = &self.scope {
            options = options.scope(scope.as_str());
        }
        if let Some(column) = &self.column {
            options = options.column(column.as_str());
        }
        if let Some(default) = &self.default {
            options = options.default(default.clone());
        }
        options
    }
}
