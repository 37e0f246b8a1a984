//! Fan-out and aggregation - fetch streets for a chunk of cities concurrently

use crate::ingestion::client::OverpassApi;
use crate::ingestion::fetch::streets_for;
use crate::ingestion::types::{City, CityStreetMap, Street};
use anyhow::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeSet;
use tracing::debug;

/// Fetch streets for every city with at most `concurrency` requests in flight.
///
/// All results are collected before returning. The first failed fetch fails
/// the whole chunk; requests still in flight are dropped.
pub async fn fetch_chunk<A: OverpassApi>(
    api: &A,
    cities: &[City],
    concurrency: usize,
) -> Result<CityStreetMap> {
    let pairs: Vec<(City, BTreeSet<Street>)> = stream::iter(cities.iter().cloned())
        .map(|city| streets_for(api, city))
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    debug!("Collected streets for {}/{} cities", pairs.len(), cities.len());
    Ok(merge(pairs))
}

/// Merge per-city results into one mapping.
/// Each city appears once per chunk, so this is plain insertion.
pub fn merge<I>(pairs: I) -> CityStreetMap
where
    I: IntoIterator<Item = (City, BTreeSet<Street>)>,
{
    let mut map = CityStreetMap::new();
    for (city, streets) in pairs {
        map.insert(city, streets);
    }
    map
}
