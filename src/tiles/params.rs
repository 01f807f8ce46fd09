//! Tiling tables and the per-zoom parameters derived from them.

use crate::{
    constants::{
        DEFAULT_ZOOM_TO_LEVEL, DEFAULT_ZOOM_TO_LINK_LENGTH, DEFAULT_ZOOM_TO_TILES_PER_EDGE,
        ZOOM_TO_LEVEL_LIMIT,
    },
    extract::RuntimeParameters,
    notify::{Notification, Notifier},
};
use serde::{Deserialize, Serialize};

/// Tables indexed by data zoom. Nothing ties their lengths together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileParams {
    pub zoom_to_level: Vec<i64>,
    pub tiles_per_edge: Vec<i64>,
    pub zoom_to_link_length: Vec<i64>,
}

/// Request parameters of one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoomTileParameters {
    /// Minimum portal level returned.
    pub level: i64,
    pub tiles_per_edge: i64,
    pub min_link_length: i64,
    pub has_portals: bool,
    pub zoom: u32,
}

impl TileParams {
    /// The built-in tables, used when detection fails.
    pub fn defaults() -> Self {
        Self::from_tables(
            DEFAULT_ZOOM_TO_LEVEL.to_vec(),
            DEFAULT_ZOOM_TO_TILES_PER_EDGE.to_vec(),
        )
    }

    /// Adopts the given tables. `zoom_to_level` is cut at 15 entries so that
    /// level filtering stops where the site stops applying it.
    pub fn from_tables(mut zoom_to_level: Vec<i64>, tiles_per_edge: Vec<i64>) -> Self {
        zoom_to_level.truncate(ZOOM_TO_LEVEL_LIMIT);
        Self {
            zoom_to_level,
            tiles_per_edge,
            zoom_to_link_length: DEFAULT_ZOOM_TO_LINK_LENGTH.to_vec(),
        }
    }

    /// Picks the extracted tables when both were found, otherwise warns the
    /// user and falls back to [`TileParams::defaults`].
    pub fn initialize(runtime: &RuntimeParameters, notifier: &dyn Notifier) -> Self {
        match (&runtime.zoom_to_level, &runtime.tiles_per_edge) {
            (Some(levels), Some(tiles)) => {
                if levels[..] != DEFAULT_ZOOM_TO_LEVEL[..]
                    || tiles[..] != DEFAULT_ZOOM_TO_TILES_PER_EDGE[..]
                {
                    log::info!("detected tile parameters differ from the built-in defaults");
                }
                Self::from_tables(levels.clone(), tiles.clone())
            }
            _ => {
                log::warn!(
                    "ZOOM_TO_LEVEL found: {}, TILES_PER_EDGE found: {}; using defaults",
                    runtime.zoom_to_level.is_some(),
                    runtime.tiles_per_edge.is_some()
                );
                notifier.notify(&Notification::warning(
                    "Intel map warning",
                    "Failed to detect the ZOOM_TO_LEVEL and/or TILES_PER_EDGE settings from the \
                     intel site. Fallback default values are in use; if detection failed the \
                     values have likely changed and the map may not load.",
                ));
                Self::defaults()
            }
        }
    }

    /// Finest grid available, used for every zoom past the table.
    pub fn max_tiles_per_edge(&self) -> i64 {
        self.tiles_per_edge.last().copied().unwrap_or(0)
    }

    pub fn map_zoom_tile_parameters(&self, zoom: u32) -> ZoomTileParameters {
        let index = zoom as usize;
        ZoomTileParameters {
            level: self.zoom_to_level.get(index).copied().unwrap_or(0),
            tiles_per_edge: self
                .tiles_per_edge
                .get(index)
                .copied()
                .unwrap_or_else(|| self.max_tiles_per_edge()),
            min_link_length: self.zoom_to_link_length.get(index).copied().unwrap_or(0),
            // no portals at all while link length limits things
            has_portals: index >= self.zoom_to_link_length.len(),
            zoom,
        }
    }
}

impl Default for TileParams {
    fn default() -> Self {
        Self::defaults()
    }
}
