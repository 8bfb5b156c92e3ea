use super::directive::{FilterDirective, QueryableParameter};
use super::options::QueryableOptions;
use crate::config::ImplicitScopeArguments;
use crate::error::Result;
use crate::params::QueryParams;
use crate::scopes::{Relation, ScopeRef};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// An ordered list of filter directives bound to one base relation.
///
/// Directives are only ever appended; querying never mutates the set, so one
/// set can be queried any number of times with different parameters.
pub struct QuerySet<R> {
    name: String,
    base: R,
    directives: Vec<FilterDirective<R>>,
    implicit_arguments: ImplicitScopeArguments,
}

impl<R: Relation> QuerySet<R> {
    pub fn new(name: impl Into<String>, base: R) -> Self {
        Self {
            name: name.into(),
            base,
            directives: Vec::new(),
            implicit_arguments: ImplicitScopeArguments::default(),
        }
    }

    /// A new set seeded with a copy of `parent`'s directives
    pub fn with_parent(name: impl Into<String>, base: R, parent: &QuerySet<R>) -> Self {
        Self {
            name: name.into(),
            base,
            directives: parent.directives.clone(),
            implicit_arguments: parent.implicit_arguments,
        }
    }

    /// How unconditional named scopes are invoked
    pub fn implicit_scope_arguments(mut self, arguments: ImplicitScopeArguments) -> Self {
        self.implicit_arguments = arguments;
        self
    }

    /// Make the set queryable with each of `parameters`, all sharing `options`.
    /// Passing no parameters is a no-op.
    pub fn queryable_with<I, S>(&mut self, parameters: I, options: QueryableOptions<R>) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directives.extend(parameters.into_iter().map(|parameter| {
            FilterDirective::Parameter(QueryableParameter::new(parameter, options.clone()))
        }));
        self
    }

    /// [`queryable_with`](Self::queryable_with) with the value transform given separately
    pub fn queryable_with_mapped<I, S, F>(
        &mut self,
        parameters: I,
        options: QueryableOptions<R>,
        mapper: F,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.queryable_with(parameters, options.map_value(mapper))
    }

    /// Add a scope that is applied on every query, e.g. `active`
    pub fn add_scope(&mut self, scope: impl Into<ScopeRef<R>>) -> &mut Self {
        self.directives.push(FilterDirective::Scope(scope.into()));
        self
    }

    /// Reduce `params` over the base relation
    pub fn query(&self, params: &QueryParams) -> Result<R> {
        self.query_on(self.base.clone(), params)
    }

    /// Reduce `params` over a caller-supplied relation, e.g. one already scoped
    pub fn query_on(&self, base: R, params: &QueryParams) -> Result<R> {
        debug!(
            query_set = %self.name,
            directives = self.directives.len(),
            params = params.len(),
            "resolving query set"
        );

        self.directives.iter().try_fold(base, |relation, directive| {
            directive.apply(relation, params, self.implicit_arguments)
        })
    }

    /// A copy of this set bound to another base relation
    pub fn rebase(&self, base: R) -> Self {
        Self {
            name: self.name.clone(),
            base,
            directives: self.directives.clone(),
            implicit_arguments: self.implicit_arguments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &R {
        &self.base
    }

    pub fn directives(&self) -> &[FilterDirective<R>] {
        &self.directives
    }

    /// Parameters the set reacts to, in registration order
    pub fn expected_parameters(&self) -> Vec<&str> {
        self.directives
            .iter()
            .filter_map(FilterDirective::expected_parameter)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

impl<R: Clone> Clone for QuerySet<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            base: self.base.clone(),
            directives: self.directives.clone(),
            implicit_arguments: self.implicit_arguments,
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for QuerySet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySet")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("directives", &self.directives)
            .field("implicit_arguments", &self.implicit_arguments)
            .finish()
    }
}
