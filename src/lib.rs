//! Chunked retrieval of the streets of every city in a country from an
//! Overpass API, written out as one `parts_{start}-{end}.csv` per chunk.

pub mod ingestion;

pub use ingestion::client::{OverpassApi, OverpassClient};
pub use ingestion::config::PipelineConfig;
pub use ingestion::error::QueryError;
pub use ingestion::retry::{Backoff, RetryPolicy};
