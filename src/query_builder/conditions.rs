/// Represents different types of SQL conditions
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Simple {
        field: String,
        operator: String,
        value: serde_json::Value,
    },
    Like {
        field: String,
        pattern: String,
    },
    In {
        field: String,
        values: Vec<serde_json::Value>,
    },
    NotIn {
        field: String,
        values: Vec<serde_json::Value>,
    },
    Between {
        field: String,
        start: serde_json::Value,
        end: serde_json::Value,
    },
    IsNull {
        field: String,
    },
    IsNotNull {
        field: String,
    },
    Raw {
        sql: String,
    },
}

impl Condition {
    /// Equality condition
    pub fn eq(field: &str, value: serde_json::Value) -> Self {
        Condition::Simple {
            field: field.to_string(),
            operator: "=".to_string(),
            value,
        }
    }

    /// LIKE condition with a ready-made pattern
    pub fn like(field: &str, pattern: &str) -> Self {
        Condition::Like {
            field: field.to_string(),
            pattern: pattern.to_string(),
        }
    }

    pub fn is_null(field: &str) -> Self {
        Condition::IsNull {
            field: field.to_string(),
        }
    }

    /// Convert condition to SQL string
    pub fn to_sql(&self) -> String {
        match self {
            Condition::Simple {
                field,
                operator,
                value,
            } => {
                format!("{} {} {}", field, operator, format_value(value))
            }
            Condition::Like { field, pattern } => {
                format!("{field} LIKE {}", quote_str(pattern))
            }
            Condition::In { field, values } => {
                let value_list = values
                    .iter()
                    .map(format_value)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field} IN ({value_list})")
            }
            Condition::NotIn { field, values } => {
                let value_list = values
                    .iter()
                    .map(format_value)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field} NOT IN ({value_list})")
            }
            Condition::Between { field, start, end } => {
                format!(
                    "{} BETWEEN {} AND {}",
                    field,
                    format_value(start),
                    format_value(end)
                )
            }
            Condition::IsNull { field } => {
                format!("{field} IS NULL")
            }
            Condition::IsNotNull { field } => {
                format!("{field} IS NOT NULL")
            }
            Condition::Raw { sql } => sql.clone(),
        }
    }
}

/// Represents a WHERE clause that can contain multiple conditions
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    pub operator: LogicalOperator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl WhereClause {
    /// Create a simple WHERE clause with a single condition
    pub fn simple(field: &str, operator: &str, value: serde_json::Value) -> Self {
        Self::and(vec![Condition::Simple {
            field: field.to_string(),
            operator: operator.to_string(),
            value,
        }])
    }

    /// Create an equality WHERE clause
    pub fn eq(field: &str, value: serde_json::Value) -> Self {
        Self::and(vec![Condition::eq(field, value)])
    }

    /// Create a WHERE ... LIKE clause
    pub fn like(field: &str, pattern: &str) -> Self {
        Self::and(vec![Condition::like(field, pattern)])
    }

    /// Create WHERE IN clause
    pub fn in_condition(field: &str, values: Vec<serde_json::Value>) -> Self {
        Self::and(vec![Condition::In {
            field: field.to_string(),
            values,
        }])
    }

    /// Create WHERE NOT IN clause
    pub fn not_in_condition(field: &str, values: Vec<serde_json::Value>) -> Self {
        Self::and(vec![Condition::NotIn {
            field: field.to_string(),
            values,
        }])
    }

    /// Create WHERE BETWEEN clause
    pub fn between(field: &str, start: serde_json::Value, end: serde_json::Value) -> Self {
        Self::and(vec![Condition::Between {
            field: field.to_string(),
            start,
            end,
        }])
    }

    /// Create WHERE IS NULL clause
    pub fn is_null(field: &str) -> Self {
        Self::and(vec![Condition::is_null(field)])
    }

    /// Create WHERE IS NOT NULL clause
    pub fn is_not_null(field: &str) -> Self {
        Self::and(vec![Condition::IsNotNull {
            field: field.to_string(),
        }])
    }

    /// Create raw SQL condition
    pub fn raw(sql: &str) -> Self {
        Self::and(vec![Condition::Raw {
            sql: sql.to_string(),
        }])
    }

    /// Equality on every column of a map, AND-ed together.
    /// `{"active": true}` becomes `active = true`.
    pub fn from_equalities<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a serde_json::Value)>,
    {
        Self::and(
            pairs
                .into_iter()
                .map(|(field, value)| match value {
                    serde_json::Value::Null => Condition::is_null(field),
                    serde_json::Value::Array(values) => Condition::In {
                        field: field.clone(),
                        values: values.clone(),
                    },
                    other => Condition::eq(field, other.clone()),
                })
                .collect(),
        )
    }

    /// Combine multiple conditions with AND
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::And,
        }
    }

    /// Combine multiple conditions with OR
    pub fn or(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::Or,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            return "1=1".to_string();
        }

        if self.conditions.len() == 1 {
            return self.conditions[0].to_sql();
        }

        let operator_str = match self.operator {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        };

        let condition_sqls: Vec<String> = self.conditions.iter().map(|c| c.to_sql()).collect();

        format!("({})", condition_sqls.join(operator_str))
    }
}

/// Format a JSON value for SQL
pub(crate) fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => quote_str(s),
        _ => quote_str(&value.to_string()),
    }
}

fn quote_str(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
