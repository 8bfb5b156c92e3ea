use crate::scopes::ScopeRef;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Transform applied to a parameter value before it is filtered on
pub type ValueMapper = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Options shared by every parameter passed to one `queryable_with` call
pub struct QueryableOptions<R> {
    pub(crate) scope: Option<ScopeRef<R>>,
    pub(crate) column: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) wildcard: bool,
    pub(crate) allow_blank: bool,
    pub(crate) value_mapper: Option<ValueMapper>,
}

impl<R> QueryableOptions<R> {
    pub fn new() -> Self {
        Self {
            scope: None,
            column: None,
            default: None,
            wildcard: false,
            allow_blank: false,
            value_mapper: None,
        }
    }

    /// Delegate to this scope instead of filtering on a column
    pub fn scope(mut self, scope: impl Into<ScopeRef<R>>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Filter on this column instead of the one named after the parameter
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Value used when the parameter is absent or blank. A `null` default is no default.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into()).filter(|v| !v.is_null());
        self
    }

    /// Substring (`LIKE '%value%'`) matching instead of equality
    pub fn wildcard(mut self, wildcard: bool) -> Self {
        self.wildcard = wildcard;
        self
    }

    /// Alias of [`wildcard`](Self::wildcard)
    pub fn fuzzy(self, fuzzy: bool) -> Self {
        self.wildcard(fuzzy)
    }

    /// Apply the filter even when the parameter is blank, as `IS NULL`
    pub fn allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    /// Pass incoming values through `mapper` first
    pub fn map_value<F>(mut self, mapper: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.value_mapper = Some(Arc::new(mapper));
        self
    }
}

impl<R> Default for QueryableOptions<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for QueryableOptions<R> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            column: self.column.clone(),
            default: self.default.clone(),
            wildcard: self.wildcard,
            allow_blank: self.allow_blank,
            value_mapper: self.value_mapper.clone(),
        }
    }
}

impl<R> fmt::Debug for QueryableOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryableOptions")
            .field("scope", &self.scope)
            .field("column", &self.column)
            .field("default", &self.default)
            .field("wildcard", &self.wildcard)
            .field("allow_blank", &self.allow_blank)
            .field("value_mapper", &self.value_mapper.is_some())
            .finish()
    }
}
