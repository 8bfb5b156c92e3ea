//! # Structured Logging Module
//!
//! Environment-aware structured logging for query set resolution. Libraries
//! embedding this crate usually install their own subscriber; this module is
//! for binaries and test harnesses that want one set up for them.

use crate::config::{LogFormat, QueryableConfig};
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with the default configuration
pub fn init_structured_logging() {
    init_structured_logging_with(&QueryableConfig::default());
}

/// Initialize structured logging. Only the first call has any effect.
pub fn init_structured_logging_with(config: &QueryableConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = config
            .log_level
            .clone()
            .unwrap_or_else(|| get_log_level(&environment).to_string());

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

        let registry = tracing_subscriber::registry().with(filter);
        let result = match config.log_format {
            LogFormat::Pretty => registry
                .with(fmt::layer().with_target(true).with_level(true))
                .try_init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_target(true).with_level(true))
                .try_init(),
        };

        // A global subscriber may already be installed by the host application
        if result.is_err() {
            tracing::debug!("Global tracing subscriber already initialized - keeping it");
        }

        tracing::info!(
            environment = %environment,
            level = %log_level,
            format = ?config.log_format,
            "structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("QUERYABLE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log a structured record of a query set dispatch
pub fn log_query_set_operation(
    model: &str,
    query_set: &str,
    operation: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::debug!(
        model = %model,
        query_set = %query_set,
        operation = %operation,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "QUERY_SET_OPERATION"
    );
}
