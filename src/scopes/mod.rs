//! # Scopes
//!
//! Named reusable filters and the [`Relation`] contract that query sets narrow.
//!
//! A relation exposes its named scopes through a [`ScopeRegistry`], which is how
//! a query set decides at call time whether a parameter can be delegated to a
//! scope of the same name instead of becoming a raw column condition.
//!
//! ```rust
//! use queryable_with::memory::{MemoryRelation, MemoryTable};
//! use queryable_with::query_builder::WhereClause;
//! use queryable_with::scopes::{Relation, ScopeRegistry};
//! use serde_json::json;
//!
//! # fn main() -> queryable_with::Result<()> {
//! let scopes = ScopeRegistry::<MemoryRelation>::new().with("active", |users, _| {
//!     Ok(users.where_clause(WhereClause::eq("users.active", json!(true))))
//! });
//!
//! let mut users = MemoryTable::new("users");
//! users.insert(json!({"name": "Guybrush", "active": true}))?;
//! users.insert(json!({"name": "LeChuck", "active": false}))?;
//!
//! let active = users.relation_with_scopes(scopes).apply_scope("active", None)?;
//! assert_eq!(active.records()?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod registry;

pub use common::Relation;
pub use registry::{ScopeFn, ScopeRef, ScopeRegistry};
