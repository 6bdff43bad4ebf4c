//! Great-circle helpers on a sphere of mean Earth radius.

use crate::types::{DEG_TO_RAD, MEAN_EARTH_RADIUS, RAD_TO_DEG};

/// Wrap a longitude into [-180, 180).
pub fn normalize_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Destination point after travelling along a great circle.
///
/// # Arguments
/// * `latitude`, `longitude` - Start point (degrees)
/// * `bearing` - Initial compass bearing, clockwise from north (degrees)
/// * `distance` - Distance along the surface (meters)
///
/// # Returns
/// `(latitude, longitude)` in degrees, longitude normalized to [-180, 180).
pub fn forward_geodesic(latitude: f64, longitude: f64, bearing: f64, distance: f64) -> (f64, f64) {
    let lat1 = latitude * DEG_TO_RAD;
    let lon1 = longitude * DEG_TO_RAD;
    let brng = bearing * DEG_TO_RAD;
    let delta = distance / MEAN_EARTH_RADIUS;

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_delta, cos_delta) = delta.sin_cos();

    let sin_lat2 = (sin_lat1 * cos_delta + cos_lat1 * sin_delta * brng.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lon2 = lon1
        + (brng.sin() * sin_delta * cos_lat1).atan2(cos_delta - sin_lat1 * sin_lat2);

    (lat2 * RAD_TO_DEG, normalize_longitude(lon2 * RAD_TO_DEG))
}

/// Haversine surface distance between two points (meters).
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1 * DEG_TO_RAD;
    let phi2 = lat2 * DEG_TO_RAD;
    let d_phi = phi2 - phi1;
    let d_lambda = (lon2 - lon1) * DEG_TO_RAD;

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS * h.clamp(0.0, 1.0).sqrt().asin()
}
