//! The contract a filterable collection fulfils so query sets can narrow it.

use super::ScopeRegistry;
use crate::error::{QueryError, Result};
use crate::query_builder::WhereClause;
use serde_json::Value;

/// A filterable view over persisted records, the Rust counterpart of a scoped
/// ActiveRecord relation.
///
/// Every operation consumes the relation and returns a further restricted one;
/// nothing is executed until the implementor is asked for rows.
pub trait Relation: Clone + Sized {
    /// Name used to qualify column references, e.g. `users` or the alias `u`
    fn table_name(&self) -> &str;

    /// Named reusable filters available on this relation
    fn scopes(&self) -> &ScopeRegistry<Self>;

    /// Restrict the relation by an ad-hoc condition
    fn where_clause(self, clause: WhereClause) -> Self;

    /// Whether a named filter with exactly this name exists
    fn has_scope(&self, name: &str) -> bool {
        self.scopes().contains(name)
    }

    /// Invoke a named filter with zero or one argument
    fn apply_scope(self, name: &str, argument: Option<&Value>) -> Result<Self> {
        let scope = self
            .scopes()
            .get(name)
            .ok_or_else(|| QueryError::UnknownScope {
                name: name.to_string(),
                table: self.table_name().to_string(),
            })?;
        scope(self, argument)
    }
}
