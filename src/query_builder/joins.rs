/// JOIN flavours a query set's base relation may be joined with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// A JOIN against another table, e.g. `users` joined to `employers`.
///
/// Joined tables commonly share column names (`name`, `email`) with the base
/// table, which is why generated filter conditions are always table-qualified.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: String,
    pub on_condition: String,
}

impl Join {
    pub fn inner(table: &str, on_condition: &str) -> Self {
        Self {
            join_type: JoinType::Inner,
            table: table.to_string(),
            on_condition: on_condition.to_string(),
        }
    }

    pub fn left(table: &str, on_condition: &str) -> Self {
        Self {
            join_type: JoinType::Left,
            table: table.to_string(),
            on_condition: on_condition.to_string(),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        format!(
            "{} {} ON {}",
            self.join_type.to_sql(),
            self.table,
            self.on_condition
        )
    }
}
