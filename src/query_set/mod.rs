//! # Query Sets
//!
//! Declarative mapping of incoming parameters onto scopes and column filters.
//!
//! A [`QuerySet`] is an ordered list of [`FilterDirective`]s over one base
//! relation. Each directive is either an unconditional scope (`add_scope`) or a
//! parameter mapping (`queryable_with`). Querying folds the directives left to
//! right, so every directive narrows what the previous ones produced:
//! directives AND together, and the values of one list-valued parameter OR.
//!
//! ## Parameter resolution
//!
//! For a parameter directive:
//!
//! 1. A blank value (null, empty or whitespace string, empty list) counts as
//!    absent. `false` and `0` are real values.
//! 2. Absent values are skipped, unless `allow_blank` (filter on `IS NULL`) or
//!    a `default` applies, in that order.
//! 3. The value mapper runs.
//! 4. An explicit `scope` option wins; otherwise a scope named after the
//!    parameter is used if the relation has one; otherwise the value becomes a
//!    table-qualified `=` (or `LIKE '%v%'` with `wildcard`) condition.
//!
//! ```rust
//! use queryable_with::memory::MemoryTable;
//! use queryable_with::query_set::{QueryableOptions, QuerySet};
//! use queryable_with::QueryParams;
//! use serde_json::json;
//!
//! # fn main() -> queryable_with::Result<()> {
//! let mut users = MemoryTable::new("users");
//! users.insert(json!({"name": "Guybrush"}))?;
//! users.insert(json!({"name": "Elaine"}))?;
//!
//! let mut search = QuerySet::new("search", users.relation());
//! search.queryable_with(["name"], QueryableOptions::new().wildcard(true));
//!
//! let found = search.query(&QueryParams::new().with("name", "uybru"))?.records()?;
//! assert_eq!(found, vec![json!({"id": 1, "name": "Guybrush"})]);
//! # Ok(())
//! # }
//! ```

pub mod definition;
pub mod directive;
pub mod options;
pub mod set;

pub use definition::{DirectiveDefinition, ParameterDefinition, QuerySetDefinition, ScopeDefinition};
pub use directive::{qualified_column, FilterDirective, QueryableParameter};
pub use options::{QueryableOptions, ValueMapper};
pub use set::QuerySet;
