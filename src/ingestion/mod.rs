//! Data ingestion module - chunked pipeline from Overpass queries to CSV parts

pub mod aggregate;
pub mod chunk;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod pipeline;
pub mod retry;
pub mod tabulate;
pub mod types;
pub mod utils;
pub mod write;

pub use types::*;
