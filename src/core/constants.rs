//! Constants of the intel site's tiling scheme and of the extraction heuristics.
//! Keeping them in a single place makes it easier to follow the site when it changes.

/// Lowest map zoom the data zoom collapse will step down to.
pub const MIN_ZOOM: u32 = 3;

/// Highest zoom the intel site serves data for; deeper map zooms are clamped.
pub const MAX_DATA_ZOOM: u32 = 21;

/// `ZOOM_TO_LEVEL` is cut at this length. The site overrides the unclaimed
/// portal zoom to 15 and above instead of updating its own table.
pub const ZOOM_TO_LEVEL_LIMIT: usize = 15;

/// Fallback for the site's `TILES_PER_EDGE`.
pub const DEFAULT_ZOOM_TO_TILES_PER_EDGE: [i64; 16] = [
    1, 1, 1, 40, 40, 80, 80, 320, 1000, 2000, 2000, 4000, 8000, 16000, 16000, 32000,
];

/// Fallback for the site's `ZOOM_TO_LEVEL`.
pub const DEFAULT_ZOOM_TO_LEVEL: [i64; 17] = [8, 8, 8, 8, 7, 7, 7, 6, 6, 5, 4, 4, 3, 2, 2, 1, 1];

/// The site uses a switch statement for link lengths, so there is nothing to
/// extract. Once a zoom runs past this table, portals are returned.
pub const DEFAULT_ZOOM_TO_LINK_LENGTH: [i64; 15] = [
    200000, 200000, 200000, 200000, 200000, 60000, 60000, 10000, 5000, 2500, 2500, 800, 300, 0, 0,
];

/// Most data tiles a single view may request.
pub const MAX_VIEW_TILES: u64 = 65_536;

/// Fixed `maxlvl` and `maxhealth` fields of a tile id.
pub const TILE_ID_MAX_LEVEL: u32 = 8;
pub const TILE_ID_MAX_HEALTH: u32 = 100;

/// Accepted length window for a candidate tiling array.
pub const TABLE_MIN_LEN: usize = 12;
pub const TABLE_MAX_LEN: usize = 18;

/// First entry of a `ZOOM_TO_LEVEL` candidate.
pub const ZOOM_TO_LEVEL_FIRST: i64 = 8;

/// Range of the last entry of a `TILES_PER_EDGE` candidate. 9000 was an older
/// value, the site has used 64000 and 32000 since.
pub const TILES_PER_EDGE_MAX_RANGE: (i64, i64) = (9000, 64000);

/// Length of the hex version token.
pub const VERSION_TOKEN_LEN: usize = 40;
