//! Overpass API client - one query function with rate-limit retry

use crate::ingestion::error::QueryError;
use crate::ingestion::retry::RetryPolicy;
use crate::ingestion::types::OverpassResponse;
use reqwest::{Client, StatusCode};
use std::future::Future;
use tracing::{debug, warn};

pub const OVERPASS_API_ENDPOINT: &str = "http://overpass-api.de/api/interpreter";

/// Output-format directive prepended to every query
pub const OUTPUT_FORMAT: &str = "[out:json];";

/// Anything that can answer an Overpass QL query.
///
/// [`OverpassClient`] is the HTTP implementation; tests substitute in-memory
/// stubs.
pub trait OverpassApi {
    fn query(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<OverpassResponse, QueryError>> + Send;
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: Client,
    endpoint: String,
    retry: RetryPolicy,
}

impl OverpassClient {
    pub fn new(http: Client, endpoint: impl Into<String>, retry: RetryPolicy) -> Self {
        OverpassClient {
            http,
            endpoint: endpoint.into(),
            retry,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `query` and decode the JSON response, retrying while the server
    /// answers 429.
    pub async fn query(&self, query: &str) -> Result<OverpassResponse, QueryError> {
        let data = format!("{}{}", OUTPUT_FORMAT, query);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let response = self
                .http
                .get(&self.endpoint)
                .query(&[("data", data.as_str())])
                .send()
                .await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if !self.retry.allows_retry(attempts) {
                    return Err(QueryError::RateLimited { attempts });
                }
                let delay = self.retry.delay_for(attempts);
                warn!(
                    "Rate limited by {} (attempt {}), retrying in {:?}",
                    self.endpoint, attempts, delay
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(QueryError::Status { status, body });
            }

            let body = response.text().await?;
            debug!("Received {} bytes from {}", body.len(), self.endpoint);
            return Ok(serde_json::from_str(&body)?);
        }
    }
}

impl OverpassApi for OverpassClient {
    fn query(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<OverpassResponse, QueryError>> + Send {
        OverpassClient::query(self, query)
    }
}
