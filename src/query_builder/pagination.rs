/// LIMIT/OFFSET applied after a query set has been resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    /// Page-based pagination, pages are 1-indexed
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            limit: Some(per_page),
            offset: Some(page.saturating_sub(1).saturating_mul(per_page)),
        }
    }

    pub fn limit_only(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    pub fn offset_only(offset: u32) -> Self {
        Self {
            limit: None,
            offset: Some(offset),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        sql
    }

    /// Apply to an already filtered list of rows
    pub fn slice<T>(&self, rows: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0) as usize;
        let rows = rows.into_iter().skip(offset);
        match self.limit {
            Some(limit) => rows.take(limit as usize).collect(),
            None => rows.collect(),
        }
    }
}
