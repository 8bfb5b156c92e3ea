#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Queryable With
//!
//! Declarative mapping of request parameters onto Rails-style scopes and column
//! filters.
//!
//! ## Overview
//!
//! A record type defines named **query sets** ahead of time: the parameters it
//! accepts, how each maps to a column or a named scope, and scopes that always
//! apply. At call time a parameter mapping is folded through the query set to
//! produce one composed, filtered relation.
//!
//! ```rust
//! use queryable_with::memory::MemoryTable;
//! use queryable_with::model::Model;
//! use queryable_with::query_builder::WhereClause;
//! use queryable_with::query_set::QueryableOptions;
//! use queryable_with::QueryParams;
//! use serde_json::json;
//!
//! # fn main() -> queryable_with::Result<()> {
//! let mut table = MemoryTable::new("users");
//! table.insert(json!({"name": "Guybrush", "active": true}))?;
//! table.insert(json!({"name": "Elaine", "active": true}))?;
//! table.insert(json!({"name": "LeChuck", "active": false}))?;
//!
//! let mut users = Model::new("User", table.relation());
//! users.query_set("search", |set| {
//!     set.add_scope(WhereClause::eq("users.active", json!(true)))
//!         .queryable_with(["name"], QueryableOptions::new().wildcard(true));
//! });
//!
//! let pirates = users.call("search", &QueryParams::new())?;
//! assert_eq!(pirates.count()?, 2);
//!
//! let guybrush = users.call("search", &QueryParams::new().with("name", "uybru"))?;
//! assert_eq!(guybrush.pluck("name")?, vec![json!("Guybrush")]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`query_set`] - Query sets, filter directives and their options
//! - [`model`] - Per-record-type registry of named query sets
//! - [`scopes`] - The [`Relation`](scopes::Relation) contract and named scopes
//! - [`query_builder`] - Conditions, joins and the SQL relation
//! - [`memory`] - In-memory relation over JSON records
//! - [`params`] - Incoming parameter mappings and blank detection
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests, including property tests
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod memory;
pub mod model;
pub mod params;
pub mod query_builder;
pub mod query_set;
pub mod scopes;

pub use config::{ImplicitScopeArguments, LogFormat, QueryableConfig};
pub use error::{QueryError, Result};
pub use memory::{MemoryRelation, MemoryTable};
pub use model::Model;
pub use params::{is_blank, QueryParams};
pub use query_builder::{Condition, QueryBuilder, WhereClause};
pub use query_set::{FilterDirective, QuerySet, QuerySetDefinition, QueryableOptions};
pub use scopes::{Relation, ScopeRef, ScopeRegistry};
