//! Utility functions for common operations

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CLIENT_USER_AGENT: &str = concat!("street-harvest/", env!("CARGO_PKG_VERSION"));

/// Log level used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Load `.env` into the process environment, then install the global
/// subscriber. `.env` goes first so a `RUST_LOG` set there takes effect.
pub fn init_logging() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(false)
        .init();
}

/// Build the log filter from `RUST_LOG` as currently set in the environment
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Build the shared HTTP client. Overpass queries for large areas can run for
/// minutes, so no timeout is set unless one is asked for.
pub fn http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(CLIENT_USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Escape a value for use inside a double-quoted Overpass QL string
pub fn escape_ql(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
