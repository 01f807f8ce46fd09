//! Shape heuristics for minified bindings.

use crate::constants::{
    TABLE_MAX_LEN, TABLE_MIN_LEN, TILES_PER_EDGE_MAX_RANGE, ZOOM_TO_LEVEL_FIRST,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// One or two characters, as produced by the site's minifier.
static MINIFIED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z$][a-zA-Z$0-9]?$").expect("valid minified name pattern"));

/// The request setup that assigns `CURRENT_VERSION` next to the CSRF header.
static VERSION_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""X-CSRFToken".*[a-z].v="([a-f0-9]{40})";"#).expect("valid version pattern")
});

pub fn is_minified_name(name: &str) -> bool {
    MINIFIED_NAME.is_match(name)
}

/// Pulls the version token out of a function's source text.
pub fn find_version_token(source: &str) -> Option<&str> {
    VERSION_ASSIGNMENT
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// What an integer array looks like. Both flags are computed independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableShape {
    pub zoom_to_level: bool,
    pub tiles_per_edge: bool,
}

impl TableShape {
    pub fn is_candidate(&self) -> bool {
        self.zoom_to_level || self.tiles_per_edge
    }
}

pub fn classify_table(values: &[i64]) -> TableShape {
    if !(TABLE_MIN_LEN..=TABLE_MAX_LEN).contains(&values.len()) {
        return TableShape::default();
    }

    TableShape {
        zoom_to_level: looks_like_zoom_to_level(values),
        tiles_per_edge: looks_like_tiles_per_edge(values),
    }
}

/// Starts at 8 and never increases.
fn looks_like_zoom_to_level(values: &[i64]) -> bool {
    values.first() == Some(&ZOOM_TO_LEVEL_FIRST) && values.windows(2).all(|w| w[0] >= w[1])
}

/// Ends in the known grid range and never decreases.
fn looks_like_tiles_per_edge(values: &[i64]) -> bool {
    let (low, high) = TILES_PER_EDGE_MAX_RANGE;
    values
        .last()
        .is_some_and(|last| (low..=high).contains(last))
        && values.windows(2).all(|w| w[0] <= w[1])
}
