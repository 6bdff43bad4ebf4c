//! Common test utilities for integration tests.

#![allow(dead_code)]

use meteorfall::geodesy::great_circle_distance;
use meteorfall::simulation::SimulationRun;
use meteorfall::types::SimulationParameters;

/// Reference scenario over La Paz.
pub fn la_paz() -> SimulationParameters {
    SimulationParameters {
        entry_latitude: -16.5,
        entry_longitude: -68.15,
        heading: 80.0,
        entry_angle: 25.0,
        speed: 18.0,
        diameter: 120.0,
        density: 3000.0,
        entry_altitude: 100_000.0,
    }
}

/// Surface distance from the entry point to the impact point (km).
pub fn ground_range_km(run: &SimulationRun) -> f64 {
    great_circle_distance(
        run.parameters.entry_latitude,
        run.parameters.entry_longitude,
        run.impact.latitude,
        run.impact.longitude,
    ) / 1000.0
}

/// Check a ring is closed and every point sits at its radius.
pub fn assert_ring_geometry(run: &SimulationRun) {
    for ring in &run.rings {
        assert_eq!(ring.boundary.first(), ring.boundary.last(), "{:?} not closed", ring.zone);
        for &(lat, lon) in &ring.boundary {
            let d = great_circle_distance(run.impact.latitude, run.impact.longitude, lat, lon);
            assert!(
                (d - ring.radius_km * 1000.0).abs() < 1e-3,
                "{:?} point at {} m, expected {} m",
                ring.zone,
                d,
                ring.radius_km * 1000.0
            );
            assert!((-180.0..180.0).contains(&lon));
        }
    }
}
