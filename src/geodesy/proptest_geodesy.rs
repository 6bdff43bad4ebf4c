//! Property-based tests for geodesy helpers using proptest.

use proptest::prelude::*;

use super::*;
use crate::trajectory::{compute_impact_point, entry_direction};
use crate::types::FALLBACK_DISTANCE;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Forward geodesic longitudes always land in [-180, 180).
    #[test]
    fn prop_forward_geodesic_longitude_normalized(
        lat in -90.0f64..=90.0,
        lon in -720.0f64..720.0,
        bearing in 0.0f64..360.0,
        distance in 0.0f64..40_000_000.0,
    ) {
        let (lat2, lon2) = forward_geodesic(lat, lon, bearing, distance);
        prop_assert!((-180.0..180.0).contains(&lon2), "longitude {} out of range", lon2);
        prop_assert!((-90.0..=90.0).contains(&lat2), "latitude {} out of range", lat2);
    }

    /// Geodetic -> ECEF -> geodetic recovers the input.
    #[test]
    fn prop_geodetic_round_trip(
        lat in -89.9f64..89.9,
        lon in -180.0f64..180.0,
        height in -1_000.0f64..200_000.0,
    ) {
        let g = ecef_to_geodetic(geodetic_to_ecef(lat, lon, height));
        prop_assert!((g.latitude - lat).abs() < 1e-9, "lat {} vs {}", g.latitude, lat);
        prop_assert!((g.longitude - lon).abs() < 1e-9, "lon {} vs {}", g.longitude, lon);
        prop_assert!((g.height - height).abs() < 1e-4, "height {} vs {}", g.height, height);
    }

    /// A ray from 100 km dipping below the horizon hits the ellipsoid on its surface.
    #[test]
    fn prop_descending_ray_hits_surface(
        lat in -80.0f64..80.0,
        lon in -180.0f64..180.0,
        heading in 0.0f64..360.0,
        angle in 10.5f64..89.0,
    ) {
        let origin = geodetic_to_ecef(lat, lon, 100_000.0);
        let (sin_h, cos_h) = (heading * DEG_TO_RAD).sin_cos();
        let (sin_a, cos_a) = (angle * DEG_TO_RAD).sin_cos();
        let enu = DVec3::new(sin_h * cos_a, cos_h * cos_a, -sin_a);
        let dir = enu_basis(lat, lon).to_ecef(enu).normalize();

        let distance = ray_ellipsoid_intersection(origin, dir);
        prop_assert!(distance.is_some());
        let distance = distance.unwrap();
        prop_assert!(distance >= 100_000.0 - 1e-6, "shorter than vertical drop: {}", distance);

        let hit = ecef_to_geodetic(origin + dir * distance);
        prop_assert!(hit.height.abs() < 1e-2, "hit height {}", hit.height);
    }

    /// Above the horizon dip (about 10.1 degrees at 100 km) the straight ray
    /// passes over the ground and the solver takes the fallback distance.
    #[test]
    fn prop_shallow_entry_takes_fallback(
        lat in -80.0f64..80.0,
        lon in -180.0f64..180.0,
        heading in 0.0f64..360.0,
        angle in 0.0f64..9.5,
    ) {
        let impact = compute_impact_point(lat, lon, 100_000.0, entry_direction(heading, angle));
        prop_assert!(impact.fallback, "angle {} reached the ground", angle);
        prop_assert_eq!(impact.total_distance, FALLBACK_DISTANCE);
        prop_assert!(impact.latitude.is_finite() && impact.longitude.is_finite());
    }
}
