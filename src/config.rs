//! # Configuration
//!
//! Process-level settings for query set resolution and logging. Values come
//! from an optional TOML file, overridden by `QUERYABLE_*` environment
//! variables:
//!
//! ```toml
//! implicit_scope_arguments = "none"   # or "params"
//! log_level = "info"
//! log_format = "json"                 # or "pretty"
//! ```

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How an unconditional named scope is invoked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplicitScopeArguments {
    /// With no argument
    #[default]
    #[serde(rename = "none")]
    Empty,
    /// With the full parameter mapping as a JSON object (compatibility mode)
    Params,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryableConfig {
    pub implicit_scope_arguments: ImplicitScopeArguments,
    /// Overrides the level derived from the environment
    pub log_level: Option<String>,
    pub log_format: LogFormat,
}

impl QueryableConfig {
    /// Load from an optional TOML file, then `QUERYABLE_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(config::Environment::with_prefix("QUERYABLE"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `QUERYABLE_*` environment variables only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(level) = &self.log_level {
            if level.parse::<tracing::Level>().is_err() {
                return Err(QueryError::ConfigurationError(format!(
                    "Invalid log_level: {level}"
                )));
            }
        }
        Ok(())
    }
}
