/// Web Mercator (EPSG:3857) helpers for a 256 px slippy-map tile pyramid.
///
/// World pixel space at zoom `z` is a square `256 * 2^z` pixels wide with the
/// origin at the north-west corner (lat ~85.05, lng -180).
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

pub const TILE_SIZE: f64 = 256.0;

/// WGS84 equatorial radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which the Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Unchecked constructor for literal data.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validating constructor for positions coming from outside the program.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, GeometryError> {
        let pos = Self::new(latitude, longitude);
        if pos.is_valid() {
            Ok(pos)
        } else {
            Err(GeometryError::OutOfRange {
                latitude,
                longitude,
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A tile address in the XYZ scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }
}

/// Side length of the world in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2_f64.powi(zoom as i32)
}

/// Number of tiles along one axis at `zoom`.
pub fn tile_count(zoom: u8) -> i64 {
    1_i64 << zoom
}

/// Wrap a longitude into [-180, 180].
pub fn wrap_lng(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 to -180; keep the antimeridian on the east side
    if wrapped == -180.0 && lng > 0.0 {
        180.0
    } else {
        wrapped
    }
}

pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}

/// Project a position to world pixel coordinates at `zoom`.
pub fn project(pos: Position, zoom: u8) -> (f64, f64) {
    let scale = world_size(zoom);
    let lat_rad = clamp_lat(pos.latitude).to_radians();
    let x = (pos.longitude + 180.0) / 360.0 * scale;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * scale;
    (x, y)
}

/// Inverse of [`project`]. Longitude is wrapped, latitude clamped to the
/// Mercator square.
pub fn unproject(x: f64, y: f64, zoom: u8) -> Position {
    let scale = world_size(zoom);
    let lng = x / scale * 360.0 - 180.0;
    let y = y.clamp(0.0, scale);
    let lat = (PI * (1.0 - 2.0 * y / scale)).sinh().atan().to_degrees();
    Position::new(clamp_lat(lat), wrap_lng(lng))
}

/// Ground resolution at `latitude` and `zoom`.
pub fn meters_per_pixel(latitude: f64, zoom: u8) -> f64 {
    let circumference = 2.0 * PI * EARTH_RADIUS_M;
    circumference * clamp_lat(latitude).to_radians().cos() / world_size(zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_accepts_bounds() {
        assert!(Position::try_new(90.0, 180.0).is_ok());
        assert!(Position::try_new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        let err = Position::try_new(91.0, 0.0).unwrap_err();
        assert!(matches!(err, GeometryError::OutOfRange { .. }));
        assert!(Position::try_new(0.0, -180.5).is_err());
        assert!(Position::try_new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_project_origin_is_world_center() {
        let (x, y) = project(Position::new(0.0, 0.0), 0);
        assert!((x - 128.0).abs() < 1e-9);
        assert!((y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_north_west_corner() {
        let (x, y) = project(Position::new(MAX_LATITUDE, -180.0), 3);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_project_unproject_roundtrip() {
        let boston = Position::new(42.3601, -71.0589);
        for zoom in [1, 13, 18] {
            let (x, y) = project(boston, zoom);
            let back = unproject(x, y, zoom);
            assert!((back.latitude - boston.latitude).abs() < 1e-9);
            assert!((back.longitude - boston.longitude).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unproject_clamps_outside_world() {
        let pos = unproject(0.0, -500.0, 2);
        assert!((pos.latitude - MAX_LATITUDE).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_lng() {
        assert!((wrap_lng(190.0) - (-170.0)).abs() < 1e-9);
        assert!((wrap_lng(-190.0) - 170.0).abs() < 1e-9);
        assert!((wrap_lng(45.0) - 45.0).abs() < 1e-9);
        assert!((wrap_lng(180.0) - 180.0).abs() < 1e-9);
        assert!((wrap_lng(-180.0) - (-180.0)).abs() < 1e-9);
    }

    #[test]
    fn test_meters_per_pixel_equator_zoom0() {
        // ~156 km per pixel at zoom 0
        let m = meters_per_pixel(0.0, 0);
        assert!((m - 156_543.03).abs() < 0.1);
    }

    #[test]
    fn test_meters_per_pixel_halves_per_zoom() {
        let a = meters_per_pixel(42.36, 13);
        let b = meters_per_pixel(42.36, 14);
        assert!((a / b - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_tile_count() {
        assert_eq!(tile_count(0), 1);
        assert_eq!(tile_count(13), 8192);
    }
}
