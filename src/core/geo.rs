use serde::{Deserialize, Serialize};

/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Longitude limit used when tiling; 180 itself would land one column past the grid.
pub const MAX_LONGITUDE: f64 = 179.999999;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Clamps latitude to the range the tile grid covers
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Clamps longitude to the columns of the tile grid
    pub fn clamp_lng(lng: f64) -> f64 {
        lng.clamp(-MAX_LONGITUDE, MAX_LONGITUDE)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    pub fn south(&self) -> f64 {
        self.south_west.lat
    }

    pub fn west(&self) -> f64 {
        self.south_west.lng
    }

    pub fn north(&self) -> f64 {
        self.north_east.lat
    }

    pub fn east(&self) -> f64 {
        self.north_east.lng
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(51.5074, -0.1278);
        assert_eq!(coord.lat, 51.5074);
        assert_eq!(coord.lng, -0.1278);
        assert!(coord.is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
    }

    #[test]
    fn test_clamp_lat() {
        assert_eq!(LatLng::clamp_lat(89.0), MAX_LATITUDE);
        assert_eq!(LatLng::clamp_lat(-89.0), -MAX_LATITUDE);
        assert_eq!(LatLng::clamp_lat(12.5), 12.5);
    }

    #[test]
    fn test_clamp_lng() {
        assert_eq!(LatLng::clamp_lng(180.0), MAX_LONGITUDE);
        assert_eq!(LatLng::clamp_lng(-180.0), -MAX_LONGITUDE);
        assert_eq!(LatLng::clamp_lng(-0.1278), -0.1278);
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_coords(40.0, -75.0, 41.0, -73.0);
        assert!(bounds.contains(&LatLng::new(40.5, -74.0)));
        assert!(!bounds.contains(&LatLng::new(42.0, -74.0)));
        assert_eq!(bounds.center(), LatLng::new(40.5, -74.0));
        assert_eq!((bounds.south(), bounds.west()), (40.0, -75.0));
        assert_eq!((bounds.north(), bounds.east()), (41.0, -73.0));
    }
}
