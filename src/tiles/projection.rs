//! Slippy map conversions on the intel site's grid
//!
//! The site's grid is the usual Web Mercator square, but with
//! `tiles_per_edge` tiles per side instead of `2^zoom`.
//! See <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>.

use super::params::ZoomTileParameters;
use crate::{
    constants::{TILE_ID_MAX_HEALTH, TILE_ID_MAX_LEVEL},
    core::geo::{LatLng, LatLngBounds},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub fn lng_to_tile(lng: f64, params: &ZoomTileParameters) -> i64 {
    ((lng + 180.0) / 360.0 * params.tiles_per_edge as f64).floor() as i64
}

pub fn lat_to_tile(lat: f64, params: &ZoomTileParameters) -> i64 {
    let lat_rad = lat.to_radians();
    ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * params.tiles_per_edge as f64)
        .floor() as i64
}

/// Western edge of column `x`.
pub fn tile_to_lng(x: i64, params: &ZoomTileParameters) -> f64 {
    x as f64 / params.tiles_per_edge as f64 * 360.0 - 180.0
}

/// Northern edge of row `y`.
pub fn tile_to_lat(y: i64, params: &ZoomTileParameters) -> f64 {
    let n = PI - 2.0 * PI * y as f64 / params.tiles_per_edge as f64;
    n.sinh().atan().to_degrees()
}

/// Request key of a tile: `zoom_x_y_minlevel_maxlevel_maxhealth`.
pub fn point_to_tile_id(params: &ZoomTileParameters, x: i64, y: i64) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}",
        params.zoom, x, y, params.level, TILE_ID_MAX_LEVEL, TILE_ID_MAX_HEALTH
    )
}

/// Indices saturate, so `lat_to_tile(-90.0)` and similar edge values are safe to pass.
pub fn tile_bounds(x: i64, y: i64, params: &ZoomTileParameters) -> LatLngBounds {
    LatLngBounds::from_coords(
        tile_to_lat(y.saturating_add(1), params),
        tile_to_lng(x, params),
        tile_to_lat(y, params),
        tile_to_lng(x.saturating_add(1), params),
    )
}

/// A data tile to request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataTile {
    pub x: i64,
    pub y: i64,
    pub id: String,
}

impl DataTile {
    pub fn new(params: &ZoomTileParameters, x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            id: point_to_tile_id(params, x, y),
        }
    }

    pub fn bounds(&self, params: &ZoomTileParameters) -> LatLngBounds {
        tile_bounds(self.x, self.y, params)
    }
}

/// Inclusive column and row span covering a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub x1: i64,
    pub x2: i64,
    pub y1: i64,
    pub y2: i64,
}

impl TileRange {
    /// The span covering `bounds`, after clamping it to the grid.
    pub fn for_bounds(bounds: &LatLngBounds, params: &ZoomTileParameters) -> Self {
        Self {
            x1: lng_to_tile(LatLng::clamp_lng(bounds.west()), params),
            x2: lng_to_tile(LatLng::clamp_lng(bounds.east()), params),
            y1: lat_to_tile(LatLng::clamp_lat(bounds.north()), params),
            y2: lat_to_tile(LatLng::clamp_lat(bounds.south()), params),
        }
    }

    /// Number of tiles in the span.
    pub fn len(&self) -> u64 {
        let width = self.x2.saturating_sub(self.x1).saturating_add(1).max(0) as u64;
        let height = self.y2.saturating_sub(self.y1).saturating_add(1).max(0) as u64;
        width.saturating_mul(height)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tiles of the span, north to south and west to east.
    pub fn tiles(self, params: &ZoomTileParameters) -> impl Iterator<Item = DataTile> + '_ {
        (self.y1..=self.y2)
            .flat_map(move |y| (self.x1..=self.x2).map(move |x| DataTile::new(params, x, y)))
    }
}

/// Tiles covering `bounds`, north to south and west to east.
///
/// The tiles are produced lazily; check [`TileRange::len`] before
/// collecting a view that may be large.
pub fn tiles_for_bounds<'a>(
    bounds: &LatLngBounds,
    params: &'a ZoomTileParameters,
) -> impl Iterator<Item = DataTile> + 'a {
    TileRange::for_bounds(bounds, params).tiles(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(zoom: u32, level: i64, tiles_per_edge: i64) -> ZoomTileParameters {
        ZoomTileParameters {
            level,
            tiles_per_edge,
            min_link_length: 0,
            has_portals: true,
            zoom,
        }
    }

    #[test]
    fn test_point_to_tile_id() {
        let p = params(17, 2, 32000);
        assert_eq!(point_to_tile_id(&p, 5, 9), "17_5_9_2_8_100");
        assert_eq!(DataTile::new(&p, 5, 9).id, "17_5_9_2_8_100");
    }

    #[test]
    fn test_known_tiles() {
        let p = params(15, 0, 32000);
        assert_eq!(lng_to_tile(-180.0, &p), 0);
        assert_eq!(lng_to_tile(0.0, &p), 16000);
        assert_eq!(lat_to_tile(0.0, &p), 16000);
        assert_eq!(tile_to_lng(16000, &p), 0.0);
        assert!(tile_to_lat(16000, &p).abs() < 1e-9);
        assert!((tile_to_lat(0, &p) - crate::core::geo::MAX_LATITUDE).abs() < 1e-6);

        let whole = params(0, 8, 1);
        assert_eq!(lng_to_tile(179.9, &whole), 0);
        assert_eq!(lat_to_tile(-60.0, &whole), 0);
    }

    #[test]
    fn test_round_trip_within_one_tile() {
        for tiles_per_edge in [40, 1000, 16000, 32000] {
            let p = params(0, 0, tiles_per_edge);
            let width = 360.0 / tiles_per_edge as f64;
            for (lat, lng) in [(51.5074, -0.1278), (-33.8688, 151.2093), (0.0001, 0.0001), (64.1, -21.9)] {
                let x = lng_to_tile(lng, &p);
                let back = tile_to_lng(x, &p);
                assert!(back <= lng && lng - back < width, "lng {lng} @ {tiles_per_edge}");

                let y = lat_to_tile(lat, &p);
                let north = tile_to_lat(y, &p);
                let south = tile_to_lat(y + 1, &p);
                assert!(south <= lat && lat <= north, "lat {lat} @ {tiles_per_edge}");
            }
        }
    }

    #[test]
    fn test_tile_bounds_contains_point() {
        let p = params(13, 3, 8000);
        let point = LatLng::new(60.1699, 24.9384);
        let tile = DataTile::new(&p, lng_to_tile(point.lng, &p), lat_to_tile(point.lat, &p));
        let bounds = tile.bounds(&p);

        assert!(bounds.contains(&point));
        assert!(bounds.north() > bounds.south());
        assert!((bounds.east() - bounds.west() - 360.0 / 8000.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiles_for_bounds() {
        let p = params(9, 5, 2000);
        let bounds = LatLngBounds::from_coords(51.40, -0.30, 51.60, 0.10);
        let tiles: Vec<_> = tiles_for_bounds(&bounds, &p).collect();

        let x1 = lng_to_tile(-0.30, &p);
        let x2 = lng_to_tile(0.10, &p);
        let y1 = lat_to_tile(51.60, &p);
        let y2 = lat_to_tile(51.40, &p);
        assert_eq!(tiles.len() as i64, (x2 - x1 + 1) * (y2 - y1 + 1));
        assert_eq!(TileRange::for_bounds(&bounds, &p).len(), tiles.len() as u64);
        assert_eq!(tiles[0], DataTile::new(&p, x1, y1));
        assert_eq!(tiles.last(), Some(&DataTile::new(&p, x2, y2)));
        assert!(tiles.iter().all(|t| t.id.starts_with("9_") && t.id.ends_with("_5_8_100")));
    }

    #[test]
    fn test_tiles_for_bounds_clamps_poles() {
        let p = params(3, 8, 40);
        let bounds = LatLngBounds::from_coords(-90.0, -180.0, 90.0, 179.0);
        let tiles: Vec<_> = tiles_for_bounds(&bounds, &p).collect();
        assert_eq!(tiles.first().map(|t| t.y), Some(0));
        assert_eq!(tiles.last().map(|t| t.y), Some(39));
    }

    #[test]
    fn test_whole_world_stays_on_grid() {
        let p = params(3, 8, 40);
        let bounds = LatLngBounds::from_coords(-10.0, -180.0, 10.0, 180.0);
        let range = TileRange::for_bounds(&bounds, &p);
        assert_eq!((range.x1, range.x2), (0, 39));

        let tiles: Vec<_> = range.tiles(&p).collect();
        assert_eq!(tiles.len() as u64, range.len());
        assert!(tiles.iter().all(|t| (0..40).contains(&t.x) && (0..40).contains(&t.y)));
        assert_eq!(tiles.last().map(|t| t.x), Some(39));
    }

    #[test]
    fn test_range_len_without_allocating() {
        let p = params(21, 0, 32000);
        let world = LatLngBounds::from_coords(-90.0, -180.0, 90.0, 180.0);
        assert_eq!(TileRange::for_bounds(&world, &p).len(), 32000 * 32000);

        let inverted = LatLngBounds::from_coords(10.0, 5.0, -10.0, -5.0);
        assert!(TileRange::for_bounds(&inverted, &p).is_empty());
        assert_eq!(tiles_for_bounds(&inverted, &p).count(), 0);
    }

    #[test]
    fn test_tile_bounds_at_saturated_index() {
        let p = params(3, 8, 40);
        let bounds = tile_bounds(i64::MAX, i64::MAX, &p);
        assert_eq!(bounds.south(), bounds.north());
        assert!(bounds.south().is_finite() && bounds.west().is_finite());

        let x = lng_to_tile(180.0, &p);
        let south_pole = tile_bounds(x, lat_to_tile(-90.0, &p), &p);
        assert_eq!(south_pole.west(), 180.0);
    }
}
