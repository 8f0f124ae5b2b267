//! Initial data for the mock backend.

use crate::error::{MockError, MockResult};
use std::path::Path;
use storefront_model::{RawSection, Section, sort_by_order};

const DEFAULT_SECTIONS: &str = include_str!("default_sections.json");

/// A homepage with one section of each type. The custom notice starts hidden.
pub fn default_sections() -> MockResult<Vec<Section>> {
    parse_seed(DEFAULT_SECTIONS)
}

/// Loads a seed file: a JSON array of wire sections.
pub fn load_seed(path: &Path) -> MockResult<Vec<Section>> {
    let text = std::fs::read_to_string(path)?;
    parse_seed(&text)
}

/// Parses a JSON array of wire sections, normalizing each one.
pub fn parse_seed(text: &str) -> MockResult<Vec<Section>> {
    let raw: Vec<RawSection> = serde_json::from_str(text)?;
    let mut sections = raw
        .into_iter()
        .map(|r| {
            r.normalize().map_err(|source| MockError::InvalidSeed {
                id: r.id.to_string(),
                source,
            })
        })
        .collect::<MockResult<Vec<_>>>()?;
    sort_by_order(&mut sections);
    Ok(sections)
}
