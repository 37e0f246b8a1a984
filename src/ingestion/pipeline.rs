//! Pipeline driver - fetch, tabulate and write one chunk of cities at a time

use crate::ingestion::aggregate::fetch_chunk;
use crate::ingestion::chunk::{chunk_bounds, chunk_of};
use crate::ingestion::client::OverpassApi;
use crate::ingestion::config::PipelineConfig;
use crate::ingestion::fetch::cities_for;
use crate::ingestion::tabulate::{cities_without_streets, to_rows};
use crate::ingestion::types::{Artifact, ChunkBounds, City, RunStats};
use crate::ingestion::write::write_chunk;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Fetch the city list for the configured country, then process it chunk by chunk
pub async fn run<A: OverpassApi>(api: &A, config: &PipelineConfig) -> Result<RunStats> {
    let cities: Vec<City> = cities_for(api, &config.country_code)
        .await?
        .into_iter()
        .collect();

    if cities.is_empty() {
        warn!("No cities found for {}", config.country_code);
    }

    run_chunks(api, &cities, config).await
}

/// Process `cities[lower_bound..upper_bound]` in strictly ascending chunks.
///
/// Every chunk is written before the next one starts, so a failure leaves all
/// earlier artifacts on disk. Resume by raising `lower_bound`.
pub async fn run_chunks<A: OverpassApi>(
    api: &A,
    cities: &[City],
    config: &PipelineConfig,
) -> Result<RunStats> {
    config.validate()?;

    let upper = config.upper_bound.unwrap_or(cities.len());
    if upper > cities.len() {
        warn!(
            "Upper bound {} is past the last city ({}), trailing chunks will be empty",
            upper,
            cities.len()
        );
    }

    let all_bounds = chunk_bounds(config.lower_bound, upper, config.chunk_size);
    let total = all_bounds.len();
    info!(
        "Processing cities [{}, {}) in {} chunks of {}",
        config.lower_bound, upper, total, config.chunk_size
    );

    let mut stats = RunStats::default();
    for (idx, bounds) in all_bounds.enumerate() {
        info!("=== Chunk {}/{} {} ===", idx + 1, total, bounds);

        let chunk = chunk_of(cities, bounds.start, bounds.end);
        let (artifact, empty) = run_chunk(api, chunk, bounds, config)
            .await
            .with_context(|| format!("Chunk {} failed", bounds))?;

        stats.chunks_written += 1;
        stats.cities_processed += chunk.len();
        stats.cities_without_streets += empty;
        stats.rows_written += artifact.rows;
    }

    Ok(stats)
}

/// Fan out, tabulate and write a single chunk.
/// Returns the artifact and the number of cities that had no streets.
pub async fn run_chunk<A: OverpassApi>(
    api: &A,
    cities: &[City],
    bounds: ChunkBounds,
    config: &PipelineConfig,
) -> Result<(Artifact, usize)> {
    info!("Step 1/3: Fetching streets for {} cities...", cities.len());
    let map = fetch_chunk(api, cities, config.concurrency).await?;
    info!("✓ Fetched streets for {} cities", map.len());

    info!("Step 2/3: Building table...");
    let rows = to_rows(&map);
    let empty = cities_without_streets(&map);
    if empty > 0 {
        warn!("{} cities returned no streets and are left out", empty);
    }
    info!("✓ Built {} rows", rows.len());

    info!("Step 3/3: Writing artifact...");
    let artifact = write_chunk(&config.output_dir, &rows, bounds, config.flush_rows)?;
    info!("✓ Wrote {:?}", artifact.path);

    Ok((artifact, empty))
}
