//! # In-Memory Relations
//!
//! A [`Relation`] over JSON records held in memory. Conditions are recorded
//! lazily and evaluated when rows are requested, mirroring how a database
//! relation only runs its SQL on load. Useful for tests, fixtures and
//! filtering data that never touches a database.
//!
//! Rows are stored with table-qualified keys (`users.name`), so a relation
//! joined to another table that shares column names can still tell them
//! apart; an unqualified reference to such a column is an error.

pub mod matching;

use crate::error::{QueryError, Result};
use crate::query_builder::{Condition, LogicalOperator, Pagination, WhereClause};
use crate::query_set::qualified_column;
use crate::scopes::{Relation, ScopeRegistry};
use matching::{compare_values, like_matches, like_text, values_equal};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::trace;

pub type Record = Map<String, Value>;

static NULL: Value = Value::Null;

/// Records of one table
#[derive(Debug, Clone)]
pub struct MemoryTable {
    name: String,
    rows: Vec<Record>,
    next_id: i64,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            next_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a record (a JSON object), assigning an `id` when it has none.
    /// Returns the stored record.
    pub fn insert(&mut self, record: Value) -> Result<Value> {
        let Value::Object(mut record) = record else {
            return Err(QueryError::ValidationError(format!(
                "records of {} must be JSON objects",
                self.name
            )));
        };

        match record.get("id").and_then(Value::as_i64) {
            Some(id) => self.next_id = self.next_id.max(id.saturating_add(1)),
            None => {
                record.insert("id".to_string(), Value::from(self.next_id));
                self.next_id = self.next_id.saturating_add(1);
            }
        }

        self.rows.push(record.clone());
        Ok(Value::Object(record))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// An unfiltered relation over a snapshot of this table
    pub fn relation(&self) -> MemoryRelation {
        MemoryRelation {
            table: self.name.clone(),
            tables: vec![self.name.clone()],
            rows: Arc::new(self.qualified_rows()),
            where_clauses: Vec::new(),
            pagination: None,
            scopes: Arc::new(ScopeRegistry::new()),
        }
    }

    /// [`relation`](Self::relation) with the table's named scopes attached
    pub fn relation_with_scopes(&self, scopes: ScopeRegistry<MemoryRelation>) -> MemoryRelation {
        self.relation().with_scopes(scopes)
    }

    fn qualified_rows(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(column, value)| (format!("{}.{}", self.name, column), value.clone()))
                    .collect()
            })
            .collect()
    }
}

/// Lazily filtered view over one table, possibly joined to others
#[derive(Debug, Clone)]
pub struct MemoryRelation {
    table: String,
    tables: Vec<String>,
    rows: Arc<Vec<Record>>,
    where_clauses: Vec<WhereClause>,
    pagination: Option<Pagination>,
    scopes: Arc<ScopeRegistry<MemoryRelation>>,
}

impl MemoryRelation {
    pub fn with_scopes(mut self, scopes: ScopeRegistry<MemoryRelation>) -> Self {
        self.scopes = Arc::new(scopes);
        self
    }

    /// INNER JOIN `other` where `left_column` equals `other.right_column`
    pub fn join(mut self, other: &MemoryTable, left_column: &str, right_column: &str) -> Self {
        let left = qualified_column(&self.table, left_column);
        let right = &qualified_column(other.name(), right_column);
        let other_rows = &other.qualified_rows();

        let rows: Vec<Record> = self
            .rows
            .iter()
            .flat_map(|row| {
                let key = row.get(&left).unwrap_or(&NULL);
                other_rows
                    .iter()
                    .filter(move |candidate| {
                        values_equal(key, candidate.get(right).unwrap_or(&NULL))
                    })
                    .map(move |candidate| {
                        let mut joined = row.clone();
                        joined.extend(candidate.clone());
                        joined
                    })
            })
            .collect();

        self.rows = Arc::new(rows);
        self.tables.push(other.name().to_string());
        self
    }

    pub fn paginate(mut self, page: u32, per_page: u32) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).limit = Some(limit);
        self
    }

    pub fn where_clauses(&self) -> &[WhereClause] {
        &self.where_clauses
    }

    /// Matching records, restricted to the base table's columns
    pub fn records(&self) -> Result<Vec<Value>> {
        let prefix = format!("{}.", self.table);
        Ok(self
            .matching_rows()?
            .into_iter()
            .map(|row| {
                Value::Object(
                    row.iter()
                        .filter_map(|(column, value)| {
                            column
                                .strip_prefix(&prefix)
                                .map(|column| (column.to_string(), value.clone()))
                        })
                        .collect(),
                )
            })
            .collect())
    }

    /// Values of one base-table column for every matching record
    pub fn pluck(&self, column: &str) -> Result<Vec<Value>> {
        Ok(self
            .records()?
            .into_iter()
            .map(|record| record.get(column).cloned().unwrap_or(Value::Null))
            .collect())
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.matching_rows()?.len())
    }

    pub fn first(&self) -> Result<Option<Value>> {
        Ok(self.clone().limit(1).records()?.into_iter().next())
    }

    fn matching_rows(&self) -> Result<Vec<&Record>> {
        let columns: BTreeSet<&str> = self
            .rows
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();

        let mut matching = Vec::new();
        for row in self.rows.iter() {
            if self.row_matches(row, &columns)? {
                matching.push(row);
            }
        }

        trace!(
            table = %self.table,
            clauses = self.where_clauses.len(),
            rows = self.rows.len(),
            matching = matching.len(),
            "evaluated in-memory relation"
        );

        Ok(match &self.pagination {
            Some(pagination) => pagination.slice(matching),
            None => matching,
        })
    }

    fn row_matches(&self, row: &Record, columns: &BTreeSet<&str>) -> Result<bool> {
        for clause in &self.where_clauses {
            if !self.clause_matches(clause, row, columns)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn clause_matches(
        &self,
        clause: &WhereClause,
        row: &Record,
        columns: &BTreeSet<&str>,
    ) -> Result<bool> {
        if clause.conditions.is_empty() {
            return Ok(true);
        }

        for condition in &clause.conditions {
            let matched = self.condition_matches(condition, row, columns)?;
            match clause.operator {
                LogicalOperator::And if !matched => return Ok(false),
                LogicalOperator::Or if matched => return Ok(true),
                _ => {}
            }
        }

        Ok(clause.operator == LogicalOperator::And)
    }

    fn condition_matches(
        &self,
        condition: &Condition,
        row: &Record,
        columns: &BTreeSet<&str>,
    ) -> Result<bool> {
        let lookup = |field: &str| self.lookup(field, row, columns);

        let matched = match condition {
            Condition::Simple {
                field,
                operator,
                value,
            } => {
                let actual = lookup(field)?;
                match operator.as_str() {
                    "=" => values_equal(actual, value),
                    "!=" | "<>" => {
                        !actual.is_null() && !value.is_null() && !values_equal(actual, value)
                    }
                    "<" => compare_values(actual, value) == Some(Ordering::Less),
                    "<=" => matches!(
                        compare_values(actual, value),
                        Some(Ordering::Less | Ordering::Equal)
                    ),
                    ">" => compare_values(actual, value) == Some(Ordering::Greater),
                    ">=" => matches!(
                        compare_values(actual, value),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                    _ => return Err(QueryError::UnsupportedCondition(condition.to_sql())),
                }
            }
            Condition::Like { field, pattern } => {
                let actual = lookup(field)?;
                !actual.is_null() && like_matches(pattern, &like_text(actual))
            }
            Condition::In { field, values } => {
                let actual = lookup(field)?;
                values.iter().any(|value| values_equal(actual, value))
            }
            Condition::NotIn { field, values } => {
                let actual = lookup(field)?;
                !actual.is_null() && !values.iter().any(|value| values_equal(actual, value))
            }
            Condition::Between { field, start, end } => {
                let actual = lookup(field)?;
                matches!(compare_values(actual, start), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(compare_values(actual, end), Some(Ordering::Less | Ordering::Equal))
            }
            Condition::IsNull { field } => lookup(field)?.is_null(),
            Condition::IsNotNull { field } => !lookup(field)?.is_null(),
            Condition::Raw { .. } => {
                return Err(QueryError::UnsupportedCondition(condition.to_sql()))
            }
        };

        Ok(matched)
    }

    fn lookup<'r>(
        &self,
        field: &str,
        row: &'r Record,
        columns: &BTreeSet<&str>,
    ) -> Result<&'r Value> {
        let column = self.resolve_column(field, columns)?;
        Ok(row.get(&column).unwrap_or(&NULL))
    }

    /// Resolve a column reference to its qualified key.
    ///
    /// Qualified references must name a table of this relation. Unqualified
    /// references must match exactly one joined column; with no match they fall
    /// back to the base table when nothing is joined.
    fn resolve_column(&self, field: &str, columns: &BTreeSet<&str>) -> Result<String> {
        if let Some((table, _)) = field.split_once('.') {
            return if self.tables.iter().any(|t| t == table) {
                Ok(field.to_string())
            } else {
                Err(self.unknown_column(field))
            };
        }

        let candidates: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|column| column.split_once('.').is_some_and(|(_, name)| name == field))
            .collect();

        match candidates.as_slice() {
            [single] => Ok(single.to_string()),
            [] if self.tables.len() == 1 => Ok(qualified_column(&self.table, field)),
            [] => Err(self.unknown_column(field)),
            _ => Err(QueryError::AmbiguousColumn {
                column: field.to_string(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }

    fn unknown_column(&self, field: &str) -> QueryError {
        QueryError::UnknownColumn {
            column: field.to_string(),
            table: self.tables.join(", "),
        }
    }
}

impl Relation for MemoryRelation {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn scopes(&self) -> &ScopeRegistry<Self> {
        &self.scopes
    }

    fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }
}
