//! Display zoom to data zoom resolution
//!
//! Data can be fetched at a zoom level other than the one the map shows.
//! Adjacent zooms often ask the server for the very same tile grid, so the
//! resolver steps down as far as it can without changing what is returned.
//! Fewer distinct data zooms means fewer requests and better cache reuse.

use super::params::{TileParams, ZoomTileParameters};
use crate::{constants::MAX_DATA_ZOOM, core::config::IntelConfig};
use serde::{Deserialize, Serialize};

/// Source of the current map display zoom.
pub trait MapView {
    fn zoom(&self) -> u32;
}

impl MapView for u32 {
    fn zoom(&self) -> u32 {
        *self
    }
}

/// One row of the map zoom to data zoom table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomTableRow {
    pub map_zoom: u32,
    pub data_zoom: u32,
    pub params: ZoomTileParameters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileResolver {
    params: TileParams,
    min_zoom: u32,
    max_data_zoom: u32,
}

impl TileResolver {
    pub fn new(params: TileParams, config: &IntelConfig) -> Self {
        Self {
            params,
            min_zoom: config.min_zoom,
            max_data_zoom: config.max_data_zoom.min(MAX_DATA_ZOOM),
        }
    }

    pub fn params(&self) -> &TileParams {
        &self.params
    }

    /// Replaces the tables; nothing derived from the old ones is kept.
    pub fn set_params(&mut self, params: TileParams) {
        self.params = params;
    }

    pub fn min_zoom(&self) -> u32 {
        self.min_zoom
    }

    pub fn max_data_zoom(&self) -> u32 {
        self.max_data_zoom
    }

    pub fn map_zoom_tile_parameters(&self, zoom: u32) -> ZoomTileParameters {
        self.params.map_zoom_tile_parameters(zoom)
    }

    pub fn data_zoom_for_map_zoom(&self, zoom: u32) -> u32 {
        // some base maps zoom deeper than the site serves data for
        let mut zoom = zoom.min(self.max_data_zoom);
        let current = self.map_zoom_tile_parameters(zoom);

        while zoom > self.min_zoom {
            let coarser = self.map_zoom_tile_parameters(zoom - 1);

            // any change in grid or portal visibility changes the returned data
            if coarser.tiles_per_edge != current.tiles_per_edge
                || coarser.has_portals != current.has_portals
                || coarser.has_portals
                || current.has_portals
            {
                break;
            }
            zoom -= 1;
        }

        zoom
    }

    /// Tile parameters of the data zoom for `zoom`, or for the view's
    /// current zoom when none is given.
    pub fn data_zoom_tile_parameters(
        &self,
        zoom: Option<u32>,
        view: &dyn MapView,
    ) -> ZoomTileParameters {
        let zoom = zoom.unwrap_or_else(|| view.zoom());
        self.map_zoom_tile_parameters(self.data_zoom_for_map_zoom(zoom))
    }

    /// Map zooms from the floor to the ceiling with the data zoom each uses.
    pub fn zoom_table(&self) -> Vec<ZoomTableRow> {
        (self.min_zoom..=self.max_data_zoom)
            .map(|map_zoom| {
                let data_zoom = self.data_zoom_for_map_zoom(map_zoom);
                ZoomTableRow {
                    map_zoom,
                    data_zoom,
                    params: self.map_zoom_tile_parameters(data_zoom),
                }
            })
            .collect()
    }

    /// Logs the zoom table at debug level, one line per distinct data zoom.
    pub fn log_zoom_parameters(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }

        let mut done = Vec::new();
        for row in self.zoom_table() {
            log::debug!(
                "map zoom {}: requesting {}{}",
                row.map_zoom,
                row.data_zoom,
                if row.data_zoom != row.map_zoom { " instead" } else { "" }
            );
            if done.contains(&row.data_zoom) {
                continue;
            }
            done.push(row.data_zoom);

            let p = row.params;
            let portals = if p.has_portals {
                format!("has portals, L{}+", p.level)
            } else {
                format!("NO portals (was L{}+)", p.level)
            };
            log::debug!(
                "data zoom {} {}, minLinkLength={}, tiles per edge={}",
                row.data_zoom,
                portals,
                p.min_link_length,
                p.tiles_per_edge
            );
        }
    }
}
