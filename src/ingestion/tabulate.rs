//! Reshape city -> streets into a long table of (city, street) rows

use crate::ingestion::types::{CityStreetMap, Row};
use std::collections::BTreeSet;

/// One row per (city, street) pair, exact duplicates removed, ordered by city
/// then street. Cities without streets produce no rows at all.
pub fn to_rows(map: &CityStreetMap) -> Vec<Row> {
    map.iter()
        .flat_map(|(city, streets)| streets.iter().map(move |street| Row::new(city, street)))
        .collect::<BTreeSet<Row>>()
        .into_iter()
        .collect()
}

/// Cities that will be missing from the table because no street was found
pub fn cities_without_streets(map: &CityStreetMap) -> usize {
    map.values().filter(|streets| streets.is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, Vec<&str>)>) -> CityStreetMap {
        entries
            .into_iter()
            .map(|(city, streets)| {
                (
                    city.to_string(),
                    streets.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_to_rows_orders_by_city_then_street() {
        let rows = to_rows(&map(vec![("B", vec!["Y", "X"]), ("A", vec!["X"])]));
        assert_eq!(
            rows,
            vec![Row::new("A", "X"), Row::new("B", "X"), Row::new("B", "Y")]
        );
    }

    #[test]
    fn test_city_without_streets_is_omitted() {
        let input = map(vec![("A", vec!["X"]), ("Empty", vec![])]);
        let rows = to_rows(&input);

        assert_eq!(rows, vec![Row::new("A", "X")]);
        assert!(rows.iter().all(|r| r.city != "Empty"));
        assert_eq!(cities_without_streets(&input), 1);
    }

    #[test]
    fn test_same_street_in_two_cities_gives_two_rows() {
        let rows = to_rows(&map(vec![("Kraków", vec!["Długa"]), ("Gdańsk", vec!["Długa"])]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Row::new("Gdańsk", "Długa"));
        assert_eq!(rows[1], Row::new("Kraków", "Długa"));
    }

    #[test]
    fn test_empty_map() {
        assert!(to_rows(&CityStreetMap::new()).is_empty());
    }
}
