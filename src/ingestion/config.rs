//! Pipeline configuration loaded from environment variables

use crate::ingestion::client::OVERPASS_API_ENDPOINT;
use crate::ingestion::retry::{RetryPolicy, DEFAULT_RETRY_INTERVAL};
use crate::ingestion::write::DEFAULT_FLUSH_ROWS;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_COUNTRY_CODE: &str = "PL";
pub const DEFAULT_CHUNK_SIZE: usize = 100;
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub country_code: String,
    pub endpoint: String,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub lower_bound: usize,
    /// Exclusive; `None` runs to the end of the city list
    pub upper_bound: Option<usize>,
    /// Max street fetches in flight within a chunk
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub request_timeout: Option<Duration>,
    pub flush_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            endpoint: OVERPASS_API_ENDPOINT.to_string(),
            output_dir: PathBuf::from("."),
            chunk_size: DEFAULT_CHUNK_SIZE,
            lower_bound: 0,
            upper_bound: None,
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            request_timeout: None,
            flush_rows: DEFAULT_FLUSH_ROWS,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PipelineConfig::default();

        let retry_interval = parse_opt::<u64>(&lookup, "RETRY_INTERVAL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RETRY_INTERVAL);
        let retry = match parse_opt::<u32>(&lookup, "RETRY_MAX_ATTEMPTS")? {
            Some(max) => RetryPolicy::bounded(max, retry_interval),
            None => RetryPolicy::unbounded(retry_interval),
        };

        let config = PipelineConfig {
            country_code: lookup("COUNTRY_CODE").unwrap_or(defaults.country_code),
            endpoint: lookup("OVERPASS_ENDPOINT").unwrap_or(defaults.endpoint),
            output_dir: lookup("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            chunk_size: parse_opt::<usize>(&lookup, "CHUNK_SIZE")?.unwrap_or(defaults.chunk_size),
            lower_bound: parse_opt::<usize>(&lookup, "LOWER_BOUND")?.unwrap_or(defaults.lower_bound),
            upper_bound: parse_opt::<usize>(&lookup, "UPPER_BOUND")?,
            concurrency: parse_opt::<usize>(&lookup, "FETCH_CONCURRENCY")?.unwrap_or(defaults.concurrency),
            retry,
            request_timeout: parse_opt::<u64>(&lookup, "REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs),
            flush_rows: parse_opt::<usize>(&lookup, "FLUSH_ROWS")?.unwrap_or(defaults.flush_rows),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            bail!("CHUNK_SIZE must be positive");
        }
        if self.concurrency == 0 {
            bail!("FETCH_CONCURRENCY must be positive");
        }
        if let Some(upper) = self.upper_bound {
            if upper < self.lower_bound {
                bail!(
                    "UPPER_BOUND ({}) is below LOWER_BOUND ({})",
                    upper,
                    self.lower_bound
                );
            }
        }
        Ok(())
    }
}

fn parse_opt<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a valid number, got {:?}", key, raw)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<PipelineConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PipelineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.country_code, "PL");
        assert_eq!(config.endpoint, OVERPASS_API_ENDPOINT);
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.lower_bound, 0);
        assert_eq!(config.upper_bound, None);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.flush_rows, 100_000);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("COUNTRY_CODE", "CZ"),
            ("OVERPASS_ENDPOINT", "http://localhost:12345/api/interpreter"),
            ("CHUNK_SIZE", "50"),
            ("LOWER_BOUND", "1100"),
            ("UPPER_BOUND", "3000"),
            ("FETCH_CONCURRENCY", "4"),
            ("RETRY_INTERVAL_MS", "250"),
            ("RETRY_MAX_ATTEMPTS", "5"),
            ("REQUEST_TIMEOUT_SECS", "600"),
        ])
        .unwrap();

        assert_eq!(config.country_code, "CZ");
        assert_eq!(config.endpoint, "http://localhost:12345/api/interpreter");
        assert_eq!(config.chunk_size, 50);
        assert_eq!(config.lower_bound, 1100);
        assert_eq!(config.upper_bound, Some(3000));
        assert_eq!(config.concurrency, 4);
        assert_eq!(
            config.retry,
            RetryPolicy::bounded(5, Duration::from_millis(250))
        );
        assert_eq!(config.request_timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_invalid_number_names_variable() {
        let err = config_from(&[("CHUNK_SIZE", "lots")]).unwrap_err();
        assert!(err.to_string().contains("CHUNK_SIZE"));
    }

    #[test]
    fn test_rejects_zero_chunk_size() {
        assert!(config_from(&[("CHUNK_SIZE", "0")]).is_err());
        assert!(config_from(&[("FETCH_CONCURRENCY", "0")]).is_err());
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        assert!(config_from(&[("LOWER_BOUND", "200"), ("UPPER_BOUND", "100")]).is_err());
    }
}
