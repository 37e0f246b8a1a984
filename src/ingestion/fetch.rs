//! Fetch functions - retrieve cities and streets from the Overpass API

use crate::ingestion::client::OverpassApi;
use crate::ingestion::parse::element_names;
use crate::ingestion::types::{City, Street};
use crate::ingestion::utils::escape_ql;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use tracing::info;

/// `admin_level` of national boundaries in OpenStreetMap
pub const COUNTRY_ADMIN_LEVEL: u8 = 2;

/// `admin_level` of municipalities (gminy in Poland, communes in France, ...)
pub const CITY_ADMIN_LEVEL: u8 = 8;

/// Query for every municipality boundary inside a country
pub fn cities_query(country_code: &str) -> String {
    format!(
        r#"area["ISO3166-1"="{code}"]["admin_level"="{country}"];
rel(area)["admin_level"="{city}"];
out;"#,
        code = escape_ql(country_code),
        country = COUNTRY_ADMIN_LEVEL,
        city = CITY_ADMIN_LEVEL,
    )
}

/// Query for every named highway inside an area called `city`
pub fn streets_query(city: &str) -> String {
    format!(
        r#"area[name="{}"];
way(area)[highway][name];
out;"#,
        escape_ql(city)
    )
}

/// Fetch the deduplicated, sorted set of city names of a country
pub async fn cities_for<A: OverpassApi>(api: &A, country_code: &str) -> Result<BTreeSet<City>> {
    info!("Fetching cities for country {}", country_code);

    let response = api
        .query(&cities_query(country_code))
        .await
        .with_context(|| format!("Failed to fetch cities for {}", country_code))?;
    let cities = element_names(&response);

    info!("Retrieved {} cities for {}", cities.len(), country_code);
    Ok(cities)
}

/// Fetch the deduplicated street names of one city.
/// An unknown area yields an empty set, not an error.
pub async fn streets_for<A: OverpassApi>(api: &A, city: City) -> Result<(City, BTreeSet<Street>)> {
    info!("Retrieving streets for {}...", city);

    let response = api
        .query(&streets_query(&city))
        .await
        .with_context(|| format!("Failed to fetch streets for {}", city))?;
    let streets = element_names(&response);

    info!("Retrieved {} streets for {}", streets.len(), city);
    Ok((city, streets))
}
