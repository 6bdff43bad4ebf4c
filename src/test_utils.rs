//! Test utilities for impact simulation tests.
//!
//! Provides reference scenarios and assertions for the geometric invariants
//! of trajectories and damage rings.

use crate::types::SimulationParameters;

/// Fixtures for commonly used parameter sets.
pub mod fixtures {
    use super::*;

    /// The default La Paz scenario: 120 m stony body at 18 km/s, 25° entry.
    pub fn la_paz() -> SimulationParameters {
        SimulationParameters::default()
    }

    /// Vertical entry over the given point.
    pub fn vertical_entry(latitude: f64, longitude: f64) -> SimulationParameters {
        SimulationParameters {
            entry_latitude: latitude,
            entry_longitude: longitude,
            entry_angle: 90.0,
            ..Default::default()
        }
    }

    /// A kilometer-class body (efficiency 0.35).
    pub fn large_impactor() -> SimulationParameters {
        SimulationParameters {
            diameter: 1000.0,
            density: 3000.0,
            speed: 20.0,
            ..Default::default()
        }
    }

    /// Entry pointing at or above the horizon; the path never lands.
    pub fn grazing_entry(entry_angle: f64) -> SimulationParameters {
        assert!(entry_angle <= 0.0, "grazing entry needs a non-positive angle");
        SimulationParameters {
            entry_angle,
            ..Default::default()
        }
    }
}

/// Assertions for trajectory and ring invariants.
pub mod assertions {
    use crate::geodesy::great_circle_distance;
    use crate::trajectory::Trajectory;

    /// Sample times never decrease.
    pub fn is_time_ordered(trajectory: &Trajectory) -> bool {
        trajectory.samples.windows(2).all(|w| w[1].time >= w[0].time)
    }

    /// Largest deviation of boundary points from the requested radius (meters).
    pub fn max_radius_error(center: (f64, f64), radius_km: f64, boundary: &[(f64, f64)]) -> f64 {
        boundary
            .iter()
            .map(|&(lat, lon)| {
                (great_circle_distance(center.0, center.1, lat, lon) - radius_km * 1000.0).abs()
            })
            .fold(0.0, f64::max)
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    ///
    /// This app uses MinimalPlugins for a lightweight test environment.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blast::compute_impact_effects;
    use crate::config::SimulationConfig;
    use crate::rings::circle_boundary;
    use crate::trajectory::solve_straight_entry;

    #[test]
    fn test_la_paz_trajectory_is_time_ordered() {
        let (_, trajectory) =
            solve_straight_entry(&fixtures::la_paz(), &SimulationConfig::default());
        assert!(assertions::is_time_ordered(&trajectory));
    }

    #[test]
    fn test_vertical_entry_lands_below_entry() {
        let params = fixtures::vertical_entry(10.0, 20.0);
        let (impact, _) = solve_straight_entry(&params, &SimulationConfig::default());
        assert!((impact.latitude - 10.0).abs() < 1e-6);
        assert!((impact.longitude - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_large_impactor_efficiency() {
        let params = fixtures::large_impactor();
        let effects = compute_impact_effects(params.diameter, params.density, params.speed);
        assert_eq!(effects.efficiency, 0.35);
    }

    #[test]
    fn test_ring_radius_error_small() {
        let ring = circle_boundary(51.5, -0.1, 40.0, 90);
        assert!(assertions::max_radius_error((51.5, -0.1), 40.0, &ring) < 1e-3);
    }

    #[test]
    #[should_panic(expected = "non-positive angle")]
    fn test_grazing_entry_rejects_descent() {
        fixtures::grazing_entry(10.0);
    }
}
