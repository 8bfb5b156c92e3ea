//! Fixtures mirroring a small users/employers schema.

#![allow(dead_code)]

use queryable_with::memory::{MemoryRelation, MemoryTable};
use queryable_with::query_builder::{Condition, WhereClause};
use queryable_with::scopes::{Relation, ScopeRegistry};
use queryable_with::{Model, QueryError};
use serde_json::{json, Value};

/// Builder for user records
pub struct UserBuilder {
    record: serde_json::Map<String, Value>,
}

impl UserBuilder {
    pub fn new(name: &str) -> Self {
        let mut record = serde_json::Map::new();
        record.insert("name".to_string(), json!(name));
        record.insert("active".to_string(), json!(true));
        record.insert("type".to_string(), json!("User"));
        record.insert("pirate".to_string(), json!(false));
        Self { record }
    }

    pub fn with(mut self, column: &str, value: Value) -> Self {
        self.record.insert(column.to_string(), value);
        self
    }

    pub fn inactive(self) -> Self {
        self.with("active", json!(false))
    }

    pub fn admin(self) -> Self {
        self.with("type", json!("Admin"))
    }

    pub fn pirate(self) -> Self {
        self.with("pirate", json!(true))
    }

    pub fn insert(self, table: &mut MemoryTable) -> Value {
        table
            .insert(Value::Object(self.record))
            .expect("Failed to insert test user")
    }
}

pub fn employers() -> MemoryTable {
    let mut employers = MemoryTable::new("employers");
    employers
        .insert(json!({"id": 1, "name": "Scumm Bar", "email": "bar@melee.island"}))
        .unwrap();
    employers
        .insert(json!({"id": 2, "name": "Governor's Mansion", "email": "mansion@melee.island"}))
        .unwrap();
    employers
}

/// Guybrush (pirate), Elaine, LeChuck (inactive pirate), Stan (no email) and Carla (admin)
pub fn users() -> MemoryTable {
    let mut users = MemoryTable::new("users");
    UserBuilder::new("Guybrush")
        .with("email", json!("guybrush@threepwood.com"))
        .with("income", json!(100))
        .with("employer_id", json!(1))
        .pirate()
        .insert(&mut users);
    UserBuilder::new("Elaine")
        .with("email", json!("elaine@marley.com"))
        .with("income", json!(5000))
        .with("employer_id", json!(2))
        .insert(&mut users);
    UserBuilder::new("LeChuck")
        .with("email", json!("lechuck@ghost.ship"))
        .with("income", json!(0))
        .inactive()
        .pirate()
        .insert(&mut users);
    UserBuilder::new("Stan")
        .with("email", Value::Null)
        .with("income", json!(750))
        .insert(&mut users);
    UserBuilder::new("Carla")
        .with("email", json!("carla@swordmaster.com"))
        .with("income", json!(300))
        .with("employer_id", json!(1))
        .admin()
        .insert(&mut users);
    users
}

/// Named scopes of the users table
pub fn user_scopes() -> ScopeRegistry<MemoryRelation> {
    let employers = employers();
    ScopeRegistry::new()
        .with("active", |users: MemoryRelation, active: Option<&Value>| {
            let active = active.cloned().unwrap_or(json!(true));
            Ok(users.where_clause(WhereClause::eq("users.active", active)))
        })
        .with("by_company", move |users: MemoryRelation, company: Option<&Value>| {
            let company = company.ok_or_else(|| QueryError::scope("by_company needs a company"))?;
            Ok(users
                .join(&employers, "employer_id", "id")
                .where_clause(WhereClause::eq("employers.name", company.clone())))
        })
        .with("rich", |users: MemoryRelation, threshold: Option<&Value>| {
            let threshold = threshold.cloned().unwrap_or(json!(1000));
            Ok(users.where_clause(WhereClause::simple("users.income", ">=", threshold)))
        })
        .with("email", |users: MemoryRelation, domain: Option<&Value>| {
            let domain = domain.and_then(Value::as_str).unwrap_or_default();
            Ok(users.where_clause(WhereClause::and(vec![Condition::like(
                "users.email",
                &format!("%@{domain}"),
            )])))
        })
}

pub fn user_relation() -> MemoryRelation {
    users().relation_with_scopes(user_scopes())
}

pub fn user_model() -> Model<MemoryRelation> {
    Model::new("User", user_relation())
}

/// Names in a result, in insertion order
pub fn names(relation: &MemoryRelation) -> Vec<String> {
    relation
        .pluck("name")
        .expect("Failed to evaluate relation")
        .into_iter()
        .filter_map(|name| name.as_str().map(str::to_string))
        .collect()
}
