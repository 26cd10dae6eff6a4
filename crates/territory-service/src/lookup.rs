//! Query parsing and the two lookups the API performs.

use crate::model::{StateReps, ZipTerritory};
use std::collections::BTreeSet;

/// Splits a comma-separated query value, trimming each piece and dropping
/// empty ones. A missing parameter yields an empty list.
pub fn parse_query_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Territories whose zip code starts with any of `prefixes`, deduplicated and
/// sorted ascending.
pub fn territories_for_zips(records: &[ZipTerritory], prefixes: &[String]) -> Vec<String> {
    records
        .iter()
        .filter(|record| {
            prefixes
                .iter()
                .any(|prefix| record.zip_code.starts_with(prefix.as_str()))
        })
        .map(|record| record.territory.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// States matching `abbreviations` exactly, in query order, each at most once.
pub fn states_by_abbreviation<'a>(
    records: &'a [StateReps],
    abbreviations: &[String],
) -> Vec<&'a StateReps> {
    let mut found: Vec<&StateReps> = Vec::new();
    for abbreviation in abbreviations {
        let matched = records
            .iter()
            .find(|record| record.state_abbreviation == *abbreviation);
        if let Some(state) = matched {
            if !found.iter().any(|seen| std::ptr::eq(*seen, state)) {
                found.push(state);
            }
        }
    }
    found
}
