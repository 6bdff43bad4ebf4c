//! Geodesy on the WGS84 ellipsoid and on the mean-radius sphere.
//!
//! Coordinate frames:
//! - Geodetic: latitude/longitude in degrees, height in meters above the ellipsoid.
//! - ECEF: Earth-centered Earth-fixed Cartesian frame in meters.
//! - ENU: local East-North-Up tangent frame at a geodetic point.
//!
//! Straight-line trajectory math happens in ECEF; damage rings use the
//! spherical helpers in [`sphere`].

pub mod sphere;

#[cfg(test)]
mod proptest_geodesy;

pub use sphere::{forward_geodesic, great_circle_distance, normalize_longitude};

use bevy::math::DVec3;
use serde::{Deserialize, Serialize};

use crate::types::{DEG_TO_RAD, RAD_TO_DEG, WGS84_A, WGS84_B, WGS84_E2};

/// Maximum refinement passes when decoding ECEF to geodetic.
const MAX_GEODETIC_ITERATIONS: usize = 6;

/// Geodetic coordinate on the WGS84 ellipsoid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    /// Latitude (degrees)
    pub latitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Height above the ellipsoid (meters)
    pub height: f64,
}

impl Geodetic {
    pub fn new(latitude: f64, longitude: f64, height: f64) -> Self {
        Self {
            latitude,
            longitude,
            height,
        }
    }

    /// Convert to ECEF (meters).
    pub fn to_ecef(&self) -> DVec3 {
        geodetic_to_ecef(self.latitude, self.longitude, self.height)
    }
}

/// Local East-North-Up unit vectors expressed in ECEF.
#[derive(Clone, Copy, Debug)]
pub struct EnuBasis {
    pub east: DVec3,
    pub north: DVec3,
    pub up: DVec3,
}

impl EnuBasis {
    /// Rotate a local ENU vector into the ECEF frame.
    pub fn to_ecef(&self, enu: DVec3) -> DVec3 {
        self.east * enu.x + self.north * enu.y + self.up * enu.z
    }
}

/// Prime vertical radius of curvature at a given sine of latitude.
fn prime_vertical_radius(sin_lat: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt()
}

/// Convert geodetic degrees and height to ECEF meters.
pub fn geodetic_to_ecef(latitude: f64, longitude: f64, height: f64) -> DVec3 {
    let lat = latitude * DEG_TO_RAD;
    let lon = longitude * DEG_TO_RAD;
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    let n = prime_vertical_radius(sin_lat);

    DVec3::new(
        (n + height) * cos_lat * cos_lon,
        (n + height) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + height) * sin_lat,
    )
}

/// Convert ECEF meters to geodetic degrees and height.
///
/// Starts from Bowring's closed-form latitude and refines it with a bounded
/// number of fixed-point passes. The height formula holds at every latitude,
/// including the poles.
pub fn ecef_to_geodetic(ecef: DVec3) -> Geodetic {
    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
    let z = ecef.z;

    if p < 1e-9 && z.abs() < 1e-9 {
        // Earth's center has no meaningful geodetic position
        return Geodetic::new(0.0, 0.0, -WGS84_A);
    }

    let longitude = ecef.y.atan2(ecef.x) * RAD_TO_DEG;

    // Bowring initial estimate
    let ep2 = (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let theta = (z * WGS84_A).atan2(p * WGS84_B);
    let (sin_t, cos_t) = theta.sin_cos();
    let mut lat = (z + ep2 * WGS84_B * sin_t.powi(3)).atan2(p - WGS84_E2 * WGS84_A * cos_t.powi(3));
    for _ in 0..MAX_GEODETIC_ITERATIONS {
        let (sin_lat, cos_lat) = lat.sin_cos();
        let n = prime_vertical_radius(sin_lat);
        let height = p * cos_lat + z * sin_lat - WGS84_A * WGS84_A / n;
        let next = z.atan2(p * (1.0 - WGS84_E2 * n / (n + height)));
        let delta = (next - lat).abs();
        lat = next;
        if delta < 1e-15 {
            break;
        }
    }

    let (sin_lat, cos_lat) = lat.sin_cos();
    let height = p * cos_lat + z * sin_lat - WGS84_A * WGS84_A / prime_vertical_radius(sin_lat);

    Geodetic {
        latitude: lat * RAD_TO_DEG,
        longitude: normalize_longitude(longitude),
        height,
    }
}

/// East-North-Up basis at a geodetic point (ellipsoid normal as "up").
pub fn enu_basis(latitude: f64, longitude: f64) -> EnuBasis {
    let (sin_lat, cos_lat) = (latitude * DEG_TO_RAD).sin_cos();
    let (sin_lon, cos_lon) = (longitude * DEG_TO_RAD).sin_cos();

    EnuBasis {
        east: DVec3::new(-sin_lon, cos_lon, 0.0),
        north: DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat),
        up: DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat),
    }
}

/// Distance along a ray to where it enters the WGS84 ellipsoid.
///
/// `direction` must be a unit vector; the returned distance is then in meters.
/// Returns `None` when the ray misses the ellipsoid or the ellipsoid lies
/// entirely behind the origin. An origin already inside the ellipsoid
/// reports a distance of zero.
pub fn ray_ellipsoid_intersection(origin: DVec3, direction: DVec3) -> Option<f64> {
    // Scale into a frame where the ellipsoid is the unit sphere
    let inv_radii = DVec3::new(1.0 / WGS84_A, 1.0 / WGS84_A, 1.0 / WGS84_B);
    let o = origin * inv_radii;
    let d = direction * inv_radii;

    let a = d.length_squared();
    if a <= 0.0 || !a.is_finite() {
        return None;
    }
    let b = 2.0 * o.dot(d);
    let c = o.length_squared() - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let near = (-b - sqrt_disc) / (2.0 * a);
    let far = (-b + sqrt_disc) / (2.0 * a);

    if far < 0.0 {
        return None;
    }
    Some(near.max(0.0))
}
