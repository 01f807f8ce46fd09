pub mod params;
pub mod projection;
pub mod resolver;

// Re-exports for convenience
pub use params::{TileParams, ZoomTileParameters};
pub use projection::{
    lat_to_tile, lng_to_tile, point_to_tile_id, tile_bounds, tile_to_lat, tile_to_lng,
    tiles_for_bounds, DataTile, TileRange,
};
pub use resolver::{MapView, TileResolver, ZoomTableRow};
