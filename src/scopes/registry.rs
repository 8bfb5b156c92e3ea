use super::Relation;
use crate::error::Result;
use crate::query_builder::WhereClause;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A named or inline filter: takes the relation and an optional argument and
/// returns the narrowed relation.
pub type ScopeFn<R> = Arc<dyn Fn(R, Option<&Value>) -> Result<R> + Send + Sync>;

/// Named reusable filters of one record type
pub struct ScopeRegistry<R> {
    scopes: BTreeMap<String, ScopeFn<R>>,
}

impl<R> ScopeRegistry<R> {
    pub fn new() -> Self {
        Self {
            scopes: BTreeMap::new(),
        }
    }

    /// Register a scope, replacing any earlier scope of the same name
    pub fn define<F>(&mut self, name: impl Into<String>, scope: F) -> &mut Self
    where
        F: Fn(R, Option<&Value>) -> Result<R> + Send + Sync + 'static,
    {
        self.scopes.insert(name.into(), Arc::new(scope));
        self
    }

    /// Chaining form of [`define`](Self::define)
    pub fn with<F>(mut self, name: impl Into<String>, scope: F) -> Self
    where
        F: Fn(R, Option<&Value>) -> Result<R> + Send + Sync + 'static,
    {
        self.define(name, scope);
        self
    }

    pub fn get(&self, name: &str) -> Option<ScopeFn<R>> {
        self.scopes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scopes.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl<R> Default for ScopeRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for ScopeRegistry<R> {
    fn clone(&self) -> Self {
        Self {
            scopes: self.scopes.clone(),
        }
    }
}

impl<R> fmt::Debug for ScopeRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.scopes.keys()).finish()
    }
}

/// Reference to a filter as accepted by `add_scope` and the `scope` option:
/// a scope name, an ad-hoc condition, or an inline function.
pub enum ScopeRef<R> {
    Named(String),
    Conditions(WhereClause),
    Function(ScopeFn<R>),
}

impl<R: Relation> ScopeRef<R> {
    /// Wrap a closure as an inline scope
    pub fn function<F>(scope: F) -> Self
    where
        F: Fn(R, Option<&Value>) -> Result<R> + Send + Sync + 'static,
    {
        ScopeRef::Function(Arc::new(scope))
    }

    /// Apply this reference to `relation`. Ad-hoc conditions ignore the argument.
    pub fn apply(&self, relation: R, argument: Option<&Value>) -> Result<R> {
        match self {
            ScopeRef::Named(name) => relation.apply_scope(name, argument),
            ScopeRef::Conditions(clause) => Ok(relation.where_clause(clause.clone())),
            ScopeRef::Function(scope) => scope(relation, argument),
        }
    }
}

impl<R> Clone for ScopeRef<R> {
    fn clone(&self) -> Self {
        match self {
            ScopeRef::Named(name) => ScopeRef::Named(name.clone()),
            ScopeRef::Conditions(clause) => ScopeRef::Conditions(clause.clone()),
            ScopeRef::Function(scope) => ScopeRef::Function(Arc::clone(scope)),
        }
    }
}

impl<R> fmt::Debug for ScopeRef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            ScopeRef::Conditions(clause) => f.debug_tuple("Conditions").field(clause).finish(),
            ScopeRef::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl<R> From<&str> for ScopeRef<R> {
    fn from(name: &str) -> Self {
        ScopeRef::Named(name.to_string())
    }
}

impl<R> From<String> for ScopeRef<R> {
    fn from(name: String) -> Self {
        ScopeRef::Named(name)
    }
}

impl<R> From<WhereClause> for ScopeRef<R> {
    fn from(clause: WhereClause) -> Self {
        ScopeRef::Conditions(clause)
    }
}
