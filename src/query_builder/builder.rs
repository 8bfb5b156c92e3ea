use super::{Join, Pagination, WhereClause};
use crate::scopes::{Relation, ScopeRegistry};
use std::sync::Arc;

#[cfg(feature = "postgres")]
use crate::error::Result;
#[cfg(feature = "postgres")]
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};
#[cfg(feature = "postgres")]
use tracing::debug;

/// SQL-rendering relation.
/// Supports ActiveRecord-style scopes, so it can be the base of a query set.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_table: String,
    select_fields: Vec<String>,
    joins: Vec<Join>,
    where_clauses: Vec<WhereClause>,
    order_by: Vec<String>,
    pagination: Option<Pagination>,
    scopes: Arc<ScopeRegistry<QueryBuilder>>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table, optionally aliased (`"users u"`)
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: vec![format!("{}.*", alias_of(table))],
            joins: Vec::new(),
            where_clauses: Vec::new(),
            order_by: Vec::new(),
            pagination: None,
            scopes: Arc::new(ScopeRegistry::new()),
        }
    }

    /// Attach the named scopes of this table
    pub fn with_scopes(mut self, scopes: ScopeRegistry<QueryBuilder>) -> Self {
        self.scopes = Arc::new(scopes);
        self
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add an INNER JOIN
    pub fn inner_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::inner(table, on_condition))
    }

    /// Add a LEFT JOIN
    pub fn left_join(self, table: &str, on_condition: &str) -> Self {
        self.join(Join::left(table, on_condition))
    }

    /// Add a simple WHERE condition
    pub fn where_eq(self, field: &str, value: serde_json::Value) -> Self {
        self.where_clause(WhereClause::eq(field, value))
    }

    /// Add WHERE IN condition
    pub fn where_in(self, field: &str, values: Vec<serde_json::Value>) -> Self {
        self.where_clause(WhereClause::in_condition(field, values))
    }

    /// Add WHERE ... LIKE condition
    pub fn where_like(self, field: &str, pattern: &str) -> Self {
        self.where_clause(WhereClause::like(field, pattern))
    }

    /// Add ORDER BY clause
    pub fn order_by(mut self, field: &str, direction: &str) -> Self {
        self.order_by.push(format!("{} {}", field, direction));
        self
    }

    /// Add ORDER BY ASC
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, "ASC")
    }

    /// Add ORDER BY DESC
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, "DESC")
    }

    /// Add pagination (LIMIT/OFFSET)
    pub fn paginate(mut self, page: u32, per_page: u32) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }

    /// Add LIMIT clause
    pub fn limit(mut self, limit: u32) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).limit = Some(limit);
        self
    }

    /// Add OFFSET clause
    pub fn offset(mut self, offset: u32) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).offset = Some(offset);
        self
    }

    pub fn where_clauses(&self) -> &[WhereClause] {
        &self.where_clauses
    }

    /// Build the complete SQL query string
    pub fn build_sql(&self) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.select_fields.join(", "),
            self.base_table
        );

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            let where_parts: Vec<String> = self
                .where_clauses
                .iter()
                .map(|clause| clause.to_sql())
                .collect();
            sql.push_str(&where_parts.join(" AND "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", self.order_by.join(", ")));
        }

        if let Some(ref pagination) = self.pagination {
            sql.push_str(&pagination.to_sql());
        }

        sql
    }

    /// SQL counting the rows this relation selects
    pub fn build_count_sql(&self) -> String {
        let mut count_builder = self.clone();
        count_builder.select_fields = vec!["COUNT(*)".to_string()];
        count_builder.order_by.clear();
        count_builder.pagination = None;
        count_builder.build_sql()
    }
}

/// Loading through sqlx. Errors surface as
/// [`QueryError::DatabaseError`](crate::QueryError::DatabaseError).
#[cfg(feature = "postgres")]
impl QueryBuilder {
    /// Every row of the relation
    pub async fn records<T>(&self, pool: &PgPool) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = self.build_sql();
        debug!(table = %self.base_table, sql = %sql, "loading relation");
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?)
    }

    /// The first row, keeping any ordering and offset already applied
    pub async fn first<T>(&self, pool: &PgPool) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = self.clone().limit(1).build_sql();
        debug!(table = %self.base_table, sql = %sql, "loading first row");
        Ok(sqlx::query_as::<_, T>(&sql).fetch_optional(pool).await?)
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64> {
        let sql = self.build_count_sql();
        debug!(table = %self.base_table, sql = %sql, "counting relation");
        let row = sqlx::query(&sql).fetch_one(pool).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    /// Whether the relation matches any row, without loading one
    pub async fn exists(&self, pool: &PgPool) -> Result<bool> {
        let sql = format!("SELECT EXISTS ({})", self.clone().select(&["1"]).build_sql());
        debug!(table = %self.base_table, sql = %sql, "probing relation");
        let row = sqlx::query(&sql).fetch_one(pool).await?;
        Ok(row.try_get::<bool, _>(0)?)
    }
}

impl Relation for QueryBuilder {
    fn table_name(&self) -> &str {
        alias_of(&self.base_table)
    }

    fn scopes(&self) -> &ScopeRegistry<Self> {
        &self.scopes
    }

    fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }
}

/// `"users u"` and `"users AS u"` are referred to as `u`
fn alias_of(table: &str) -> &str {
    table.split_whitespace().last().unwrap_or(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_query_building() {
        let query = QueryBuilder::new("users")
            .select(&["id", "name", "email"])
            .where_eq("users.employer_id", json!(1))
            .order_desc("name")
            .limit(10);

        let sql = query.build_sql();
        assert!(sql.contains("SELECT id, name, email"));
        assert!(sql.contains("FROM users"));
        assert!(sql.contains("WHERE users.employer_id = 1"));
        assert!(sql.contains("ORDER BY name DESC"));
        assert!(sql.ends_with("LIMIT 10"));
    }

    #[test]
    fn test_default_select_is_table_qualified() {
        let sql = QueryBuilder::new("users").build_sql();
        assert_eq!(sql, "SELECT users.* FROM users");
    }

    #[test]
    fn test_alias_is_table_name() {
        let query = QueryBuilder::new("users u");
        assert_eq!(query.table_name(), "u");
        assert_eq!(query.build_sql(), "SELECT u.* FROM users u");
        assert_eq!(QueryBuilder::new("users AS u").table_name(), "u");
    }

    #[test]
    fn test_join_query_building() {
        let query = QueryBuilder::new("users")
            .inner_join("employers", "employers.id = users.employer_id")
            .where_like("employers.name", "%Scumm%");

        assert_eq!(
            query.build_sql(),
            "SELECT users.* FROM users INNER JOIN employers ON employers.id = users.employer_id \
             WHERE employers.name LIKE '%Scumm%'"
        );
    }

    #[test]
    fn test_count_sql_drops_ordering_and_pagination() {
        let query = QueryBuilder::new("users")
            .where_in("users.id", vec![json!(1), json!(2)])
            .order_asc("name")
            .paginate(2, 5);
        assert_eq!(
            query.build_count_sql(),
            "SELECT COUNT(*) FROM users WHERE users.id IN (1, 2)"
        );
    }

    #[test]
    fn test_limit_then_offset() {
        let sql = QueryBuilder::new("users").limit(5).offset(10).build_sql();
        assert!(sql.ends_with(" LIMIT 5 OFFSET 10"));
    }

    #[test]
    fn test_scopes_are_visible() {
        let scopes = ScopeRegistry::new().with(
            "active",
            |q: QueryBuilder, _: Option<&serde_json::Value>| {
                Ok(q.where_eq("users.active", json!(true)))
            },
        );
        let query = QueryBuilder::new("users").with_scopes(scopes);
        assert!(query.has_scope("active"));
        assert!(!query.has_scope("inactive"));

        let sql = query.apply_scope("active", None).unwrap().build_sql();
        assert_eq!(sql, "SELECT users.* FROM users WHERE users.active = true");
    }
}
