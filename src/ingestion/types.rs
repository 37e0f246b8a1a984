//! Core data types for the ingestion pipeline
//! Pure data structures with no behavior beyond formatting

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

/// City name, unique within a retrieved city set
pub type City = String;

/// Street name, scoped to the city it was fetched for
pub type Street = String;

/// City -> streets, built by merging per-city fetch results
pub type CityStreetMap = BTreeMap<City, BTreeSet<Street>>;

/// Raw Overpass API response (only the parts we read)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
    pub osm3s: Option<Osm3s>,
}

/// A single node/way/relation in the response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl Element {
    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }
}

/// Data freshness metadata attached to every response
#[derive(Debug, Clone, Deserialize)]
pub struct Osm3s {
    pub timestamp_osm_base: String,
    pub timestamp_areas_base: String,
}

/// One persisted (city, street) observation. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Row {
    pub city: City,
    pub street: Street,
}

impl Row {
    pub fn new(city: impl Into<City>, street: impl Into<Street>) -> Self {
        Row {
            city: city.into(),
            street: street.into(),
        }
    }
}

/// Half-open index range [start, end) over the ordered city list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
    pub start: usize,
    pub end: usize,
}

impl ChunkBounds {
    /// Artifact file name, deterministic in the bounds
    pub fn artifact_name(&self) -> String {
        format!("parts_{}-{}.csv", self.start, self.end)
    }
}

impl std::fmt::Display for ChunkBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A written chunk file
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub bounds: ChunkBounds,
    pub rows: usize,
}

/// Pipeline run statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub chunks_written: usize,
    pub cities_processed: usize,
    pub cities_without_streets: usize,
    pub rows_written: usize,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "chunks: {}, cities: {}, cities without streets: {}, rows: {}",
            self.chunks_written,
            self.cities_processed,
            self.cities_without_streets,
            self.rows_written
        )
    }
}
