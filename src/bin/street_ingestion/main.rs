//! Street ingestion - downloads every street of every city of a country in chunks

use anyhow::Result;
use std::process::ExitCode;
use street_harvest::ingestion::{pipeline, utils, RunStats};
use street_harvest::{OverpassClient, PipelineConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_logging();

    info!("🗺️  Starting street ingestion...");

    match ingest().await {
        Ok(stats) => {
            info!("✅ Street ingestion complete: {}", stats);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ Street ingestion failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn ingest() -> Result<RunStats> {
    let config = PipelineConfig::from_env()?;
    info!(
        "Configuration loaded: country {}, chunk size {}, endpoint {}",
        config.country_code, config.chunk_size, config.endpoint
    );

    let http = utils::http_client(config.request_timeout)?;
    let client = OverpassClient::new(http, config.endpoint.clone(), config.retry);

    pipeline::run(&client, &config).await
}
