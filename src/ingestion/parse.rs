//! Parse functions - pull names and metadata out of Overpass responses

use crate::ingestion::error::QueryError;
use crate::ingestion::types::OverpassResponse;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::debug;

/// Deduplicated `name` tags of all elements. Unnamed elements are skipped.
pub fn element_names(response: &OverpassResponse) -> BTreeSet<String> {
    let mut unnamed = 0usize;
    let names = response
        .elements
        .iter()
        .filter_map(|element| {
            let name = element.name();
            if name.is_none() {
                unnamed += 1;
            }
            name.map(str::to_string)
        })
        .collect();

    if unnamed > 0 {
        debug!("Skipped {} elements without a name tag", unnamed);
    }
    names
}

/// Data freshness of a response: the least recent of its two base timestamps
pub fn extract_timestamp(response: &OverpassResponse) -> Result<DateTime<Utc>, QueryError> {
    let osm3s = response
        .osm3s
        .as_ref()
        .ok_or(QueryError::MissingMetadata)?;

    let osm_base = parse_timestamp(&osm3s.timestamp_osm_base)?;
    let areas_base = parse_timestamp(&osm3s.timestamp_areas_base)?;

    Ok(osm_base.min(areas_base))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, QueryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| QueryError::Timestamp {
            value: value.to_string(),
            source,
        })
}
