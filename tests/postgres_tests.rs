//! Query sets resolved over [`QueryBuilder`] and loaded from PostgreSQL.

#![cfg(feature = "postgres")]

use queryable_with::query_builder::QueryBuilder;
use queryable_with::query_set::QueryableOptions;
use queryable_with::scopes::ScopeRegistry;
use queryable_with::{Model, QueryError, QueryParams, Result};
use serde_json::{json, Value};
use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
}

async fn seed(pool: &PgPool) -> Result<()> {
    for statement in [
        "CREATE TABLE employers (id BIGINT PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE users (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            employer_id BIGINT REFERENCES employers (id)
        )",
        "INSERT INTO employers (id, name) VALUES (1, 'Scumm Bar'), (2, 'Governor''s Mansion')",
        "INSERT INTO users (name, email, active, employer_id) VALUES
            ('Guybrush', 'guybrush@threepwood.com', TRUE, 1),
            ('Elaine', 'elaine@marley.com', TRUE, 2),
            ('LeChuck', 'lechuck@ghost.ship', FALSE, NULL),
            ('Stan', NULL, TRUE, NULL)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

fn user_model() -> Model<QueryBuilder> {
    let scopes = ScopeRegistry::new()
        .with("active", |users: QueryBuilder, _: Option<&Value>| {
            Ok(users.where_eq("users.active", json!(true)))
        })
        .with("by_company", |users: QueryBuilder, company: Option<&Value>| {
            let company = company.ok_or_else(|| QueryError::scope("by_company needs a company"))?;
            Ok(users
                .inner_join("employers", "employers.id = users.employer_id")
                .where_eq("employers.name", company.clone()))
        });

    let mut users = Model::new("User", QueryBuilder::new("users").with_scopes(scopes));
    users.query_set("search", |set| {
        set.add_scope("active")
            .queryable_with(["name"], QueryableOptions::new().wildcard(true))
            .queryable_with(["company"], QueryableOptions::new().scope("by_company"))
            .queryable_with(["employer_id"], QueryableOptions::new());
    });
    users
}

fn names(rows: &[UserRow]) -> Vec<&str> {
    rows.iter().map(|row| row.name.as_str()).collect()
}

#[sqlx::test(migrations = false)]
async fn test_empty_params_load_active_users(pool: PgPool) -> Result<()> {
    seed(&pool).await?;
    let users = user_model();

    let relation = users.call("search", &QueryParams::new())?.order_asc("users.id");
    let rows: Vec<UserRow> = relation.records(&pool).await?;
    assert_eq!(names(&rows), vec!["Guybrush", "Elaine", "Stan"]);
    assert_eq!(relation.count(&pool).await?, 3);
    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_wildcard_filter_runs_in_postgres(pool: PgPool) -> Result<()> {
    seed(&pool).await?;
    let users = user_model();

    let relation = users.call("search", &QueryParams::new().with("name", "uybru"))?;
    let guybrush: Option<UserRow> = relation.first(&pool).await?;
    assert_eq!(guybrush.map(|row| row.name).as_deref(), Some("Guybrush"));

    let nobody = users.call("search", &QueryParams::new().with("name", "zzz"))?;
    assert!(!nobody.exists(&pool).await?);
    assert!(relation.exists(&pool).await?);
    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_joined_scope_keeps_columns_unambiguous(pool: PgPool) -> Result<()> {
    seed(&pool).await?;
    let users = user_model();

    // users and employers both have a name column
    let params = QueryParams::new().with("company", "Scumm Bar").with("name", "brush");
    let rows: Vec<UserRow> = users.call("search", &params)?.records(&pool).await?;
    assert_eq!(names(&rows), vec!["Guybrush"]);
    assert_eq!(rows[0].id, 1);
    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_list_with_null_loads_matching_rows(pool: PgPool) -> Result<()> {
    seed(&pool).await?;
    let users = user_model();

    let params = QueryParams::new().with("employer_id", json!([2, null]));
    let relation = users.call("search", &params)?.order_asc("users.id");
    let rows: Vec<UserRow> = relation.records(&pool).await?;
    assert_eq!(names(&rows), vec!["Elaine", "Stan"]);
    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_database_errors_are_reported(pool: PgPool) -> Result<()> {
    let users = user_model();

    // nothing seeded, so the table does not exist
    let result = users.call("search", &QueryParams::new())?.count(&pool).await;
    assert!(matches!(result, Err(QueryError::DatabaseError(_))));
    Ok(())
}
