//! Core coordinate utilities
//!
//! Geographic (latitude/longitude) to scene-frame conversions shared by the
//! solar position calculator, the location marker and meridian labels.
//!
//! Scene frame: Earth is a unit sphere at the origin, +Y is the north pole and
//! the prime meridian at the equator maps to +Z. Longitude is negated before
//! the spherical conversion so that east longitudes land on -X.

use bevy::math::{DVec3, Vec3};
use std::f64::consts::PI;
use thiserror::Error;

/// Earth radius in scene units. All other distances are relative to it.
pub const EARTH_RADIUS: f64 = 1.0;

// ========================= Geographic coordinates and helpers =========================

#[derive(Debug, Error, PartialEq)]
pub enum CoordError {
    #[error("Invalid latitude: {0:?}")]
    Latitude(f64),
    #[error("Invalid longitude: {0:?}")]
    Longitude(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinates {
    // Stored internally in radians
    pub latitude: f64,
    pub longitude: f64,
}

impl From<DVec3> for GeoCoordinates {
    fn from(value: DVec3) -> Self {
        scene_to_geo(value)
    }
}

impl From<Vec3> for GeoCoordinates {
    fn from(value: Vec3) -> Self {
        scene_to_geo(value.as_dvec3())
    }
}

impl GeoCoordinates {
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordError::Longitude(longitude));
        }
        Ok(GeoCoordinates {
            latitude: latitude.to_radians(),
            longitude: longitude.to_radians(),
        })
    }

    pub fn as_degrees(&self) -> (f64, f64) {
        (self.latitude * (180.0 / PI), self.longitude * (180.0 / PI))
    }

    /// Scene position at `radius`, with an optional texture-alignment offset
    /// added to the longitude before conversion.
    pub fn to_scene(&self, radius: f64, longitude_offset_deg: f64) -> DVec3 {
        let (lat, lon) = self.as_degrees();
        geo_to_scene(lat, lon + longitude_offset_deg, radius)
    }
}

/// Convert latitude/longitude (degrees) to a scene position at `radius`.
pub fn geo_to_scene(lat_deg: f64, lon_deg: f64, radius: f64) -> DVec3 {
    let lat = lat_deg.to_radians();
    let lon = -lon_deg.to_radians();

    let mut r = lat.cos();
    // Clamp residual radius near the poles
    if (std::f64::consts::FRAC_PI_2 - lat.abs()).abs() < 1e-12 {
        r = 0.0;
    }

    DVec3::new(-r * lon.sin(), lat.sin(), r * lon.cos()) * radius
}

/// Inverse of [`geo_to_scene`]. The zero vector maps to (0, 0).
pub fn scene_to_geo(v: DVec3) -> GeoCoordinates {
    let radius = v.length();
    if radius <= f64::EPSILON {
        return GeoCoordinates {
            latitude: 0.0,
            longitude: 0.0,
        };
    }
    let latitude = (v.y / radius).clamp(-1.0, 1.0).asin();
    let longitude = (-v.x).atan2(v.z);
    GeoCoordinates {
        latitude,
        longitude,
    }
}

// =================================== Tests ===================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_coordinates_from_degrees_valid() {
        let coord = GeoCoordinates::from_degrees(45.0, 90.0).unwrap();
        let (lat_deg, lon_deg) = coord.as_degrees();

        assert!((lat_deg - 45.0).abs() < EPSILON);
        assert!((lon_deg - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_coordinates_from_degrees_boundary_values() {
        assert!(GeoCoordinates::from_degrees(90.0, 180.0).is_ok());
        assert!(GeoCoordinates::from_degrees(-90.0, -180.0).is_ok());
        assert!(GeoCoordinates::from_degrees(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_coordinates_from_degrees_invalid() {
        assert_eq!(
            GeoCoordinates::from_degrees(91.0, 0.0),
            Err(CoordError::Latitude(91.0))
        );
        assert_eq!(
            GeoCoordinates::from_degrees(0.0, -181.0),
            Err(CoordError::Longitude(-181.0))
        );
    }

    #[test]
    fn test_prime_meridian_faces_positive_z() {
        let p = geo_to_scene(0.0, 0.0, EARTH_RADIUS);
        assert!(p.x.abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
        assert!((p.z - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_east_longitude_maps_to_negative_x() {
        let p = geo_to_scene(0.0, 90.0, 2.0);
        assert!((p.x + 2.0).abs() < EPSILON);
        assert!(p.z.abs() < EPSILON);
    }

    #[test]
    fn test_north_pole() {
        let p = geo_to_scene(90.0, 37.0, 1.0);
        assert!((p.y - 1.0).abs() < EPSILON);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_roundtrip_conversion() {
        for (lat, lon) in [(39.9, 116.4), (-33.9, 151.2), (51.5, -0.1), (-54.8, -68.3)] {
            let p = geo_to_scene(lat, lon, 3.5);
            assert!((p.length() - 3.5).abs() < EPSILON);
            let (lat2, lon2) = scene_to_geo(p).as_degrees();
            assert!((lat2 - lat).abs() < 1e-9, "lat {} vs {}", lat2, lat);
            assert!((lon2 - lon).abs() < 1e-9, "lon {} vs {}", lon2, lon);
        }
    }

    #[test]
    fn test_longitude_offset_is_applied() {
        let coord = GeoCoordinates::from_degrees(0.0, 10.0).unwrap();
        let shifted = coord.to_scene(1.0, -10.0);
        assert!((shifted - geo_to_scene(0.0, 0.0, 1.0)).length() < EPSILON);
    }

    #[test]
    fn test_scene_to_geo_zero_vector() {
        let coord = scene_to_geo(DVec3::ZERO);
        assert_eq!(coord.latitude, 0.0);
        assert_eq!(coord.longitude, 0.0);
    }

    #[test]
    fn test_from_f32_vector() {
        let coord: GeoCoordinates = Vec3::new(0.0, 0.0, 1.0).into();
        let (lat, lon) = coord.as_degrees();
        assert!(lat.abs() < 1e-6);
        assert!(lon.abs() < 1e-6);
    }
}
