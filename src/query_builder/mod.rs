//! # Query Builder System
//!
//! SQL building blocks shared by every relation implementation.
//!
//! ## Key Components
//!
//! - [`conditions`] - WHERE clause building; the currency query sets narrow relations with
//! - [`joins`] - JOIN clauses, the reason generated filters are table-qualified
//! - [`pagination`] - LIMIT/OFFSET
//! - [`builder`] - [`QueryBuilder`], a [`Relation`](crate::scopes::Relation) rendering PostgreSQL
//!
//! ## Example Usage
//!
//! ```rust
//! use queryable_with::query_builder::QueryBuilder;
//! use queryable_with::query_set::{QueryableOptions, QuerySet};
//! use queryable_with::QueryParams;
//!
//! # fn main() -> queryable_with::Result<()> {
//! let base = QueryBuilder::new("users")
//!     .inner_join("employers", "employers.id = users.employer_id");
//!
//! let mut search = QuerySet::new("search", base);
//! search.queryable_with(["name"], QueryableOptions::new());
//!
//! let sql = search.query(&QueryParams::new().with("name", "Guybrush"))?.build_sql();
//! assert!(sql.ends_with("WHERE users.name = 'Guybrush'"));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod pagination;

pub use builder::QueryBuilder;
pub use conditions::{Condition, LogicalOperator, WhereClause};
pub use joins::{Join, JoinType};
pub use pagination::Pagination;
