//! # Models
//!
//! A [`Model`] describes one record type: its base relation and the named query
//! sets registered against it. It is the Rust shape of defining
//! `query_set :search do ... end` on an ActiveRecord class and then calling
//! `User.search(params)`.
//!
//! ```rust
//! use queryable_with::memory::MemoryTable;
//! use queryable_with::model::Model;
//! use queryable_with::query_set::QueryableOptions;
//! use queryable_with::QueryParams;
//! use serde_json::json;
//!
//! # fn main() -> queryable_with::Result<()> {
//! let mut table = MemoryTable::new("users");
//! table.insert(json!({"name": "Guybrush"}))?;
//! table.insert(json!({"name": "Elaine"}))?;
//!
//! let mut users = Model::new("User", table.relation());
//! users.query_set("search", |set| {
//!     set.queryable_with(["name"], QueryableOptions::new());
//! });
//!
//! assert_eq!(users.call("search", &QueryParams::new())?.count()?, 2);
//! assert_eq!(users.call("search", &QueryParams::new().with("name", "Elaine"))?.count()?, 1);
//! # Ok(())
//! # }
//! ```

use crate::config::QueryableConfig;
use crate::error::{QueryError, Result};
use crate::logging::log_query_set_operation;
use crate::params::QueryParams;
use crate::query_set::{QuerySet, QuerySetDefinition};
use crate::scopes::Relation;
use std::collections::HashMap;
use tracing::debug;

/// A record type with its own named query sets
#[derive(Debug, Clone)]
pub struct Model<R> {
    name: String,
    base: R,
    config: QueryableConfig,
    query_sets: HashMap<String, QuerySet<R>>,
}

impl<R: Relation> Model<R> {
    pub fn new(name: impl Into<String>, base: R) -> Self {
        Self::with_config(name, base, QueryableConfig::default())
    }

    pub fn with_config(name: impl Into<String>, base: R, config: QueryableConfig) -> Self {
        Self {
            name: name.into(),
            base,
            config,
            query_sets: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &R {
        &self.base
    }

    /// Define the query set `name`, or reopen it if it already exists, and run
    /// `configure` against it
    pub fn query_set<F>(&mut self, name: &str, configure: F) -> &mut QuerySet<R>
    where
        F: FnOnce(&mut QuerySet<R>),
    {
        let set = self.query_set_entry(name);
        configure(&mut *set);
        set
    }

    /// Define the query set `name` starting from a copy of `parent`'s directives
    pub fn query_set_with_parent<F>(
        &mut self,
        name: &str,
        parent: &str,
        configure: F,
    ) -> Result<&mut QuerySet<R>>
    where
        F: FnOnce(&mut QuerySet<R>),
    {
        let parent = self
            .query_sets
            .get(parent)
            .ok_or_else(|| QueryError::UnknownQuerySet(parent.to_string()))?;
        let set = QuerySet::with_parent(name, self.base.clone(), parent);

        debug!(
            model = %self.name,
            query_set = name,
            parent = parent.name(),
            "defining query set from parent"
        );
        self.query_sets.insert(name.to_string(), set);
        Ok(self.query_set(name, configure))
    }

    /// Define or extend the query set `name` from a declarative definition
    pub fn load_query_set(
        &mut self,
        name: &str,
        definition: &QuerySetDefinition,
    ) -> &mut QuerySet<R> {
        self.query_set(name, |set| definition.apply_to(set))
    }

    /// Resolve `params` through the query set `name` over the model's base relation
    pub fn call(&self, name: &str, params: &QueryParams) -> Result<R> {
        self.call_on(name, self.base.clone(), params)
    }

    /// Resolve `params` through the query set `name` over an already narrowed relation
    pub fn call_on(&self, name: &str, base: R, params: &QueryParams) -> Result<R> {
        let set = self.get(name)?;
        let result = set.query_on(base, params);

        let status = if result.is_ok() { "ok" } else { "error" };
        let details = result.as_ref().err().map(ToString::to_string);
        log_query_set_operation(&self.name, name, "call", status, details.as_deref());

        result
    }

    /// A callable bound to one query set, the equivalent of a generated `User.search`.
    /// Dispatches through [`call`](Self::call).
    pub fn accessor(&self, name: &str) -> Result<impl Fn(&QueryParams) -> Result<R> + '_> {
        let name = self.get(name)?.name().to_string();
        Ok(move |params: &QueryParams| self.call(&name, params))
    }

    pub fn get(&self, name: &str) -> Result<&QuerySet<R>> {
        self.query_sets
            .get(name)
            .ok_or_else(|| QueryError::UnknownQuerySet(name.to_string()))
    }

    pub fn has_query_set(&self, name: &str) -> bool {
        self.query_sets.contains_key(name)
    }

    /// Names of every registered query set, sorted
    pub fn query_set_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.query_sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn remove_query_set(&mut self, name: &str) -> Option<QuerySet<R>> {
        self.query_sets.remove(name)
    }

    pub fn clear_query_sets(&mut self) {
        self.query_sets.clear();
    }

    /// A derived record type over `base` that starts with copies of all of this
    /// model's query sets. Query sets added to either afterwards are independent.
    pub fn derive(&self, name: impl Into<String>, base: R) -> Self {
        let query_sets = self
            .query_sets
            .iter()
            .map(|(set_name, set)| (set_name.clone(), set.rebase(base.clone())))
            .collect();

        Self {
            name: name.into(),
            base,
            config: self.config.clone(),
            query_sets,
        }
    }

    fn query_set_entry(&mut self, name: &str) -> &mut QuerySet<R> {
        let base = &self.base;
        let config = &self.config;
        self.query_sets.entry(name.to_string()).or_insert_with(|| {
            QuerySet::new(name, base.clone())
                .implicit_scope_arguments(config.implicit_scope_arguments)
        })
    }
}
