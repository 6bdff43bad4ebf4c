//! Atmospheric entry trajectory solver.
//!
//! The reference model is a straight line in ECEF from the entry point at
//! 100 km down to the WGS84 ellipsoid:
//! 1. Build the descent direction in the local ENU frame
//! 2. Rotate it into ECEF and intersect the ray with the ellipsoid analytically
//! 3. Sample the segment evenly, forcing the last sample onto the impact point
//!
//! A lower-fidelity stepped mode advances along a great circle with constant
//! ground speed and descent rate instead.

use bevy::log::warn;
use bevy::math::DVec3;
use serde::{Deserialize, Serialize};

use crate::geodesy::{
    Geodetic, ecef_to_geodetic, enu_basis, forward_geodesic, geodetic_to_ecef,
    great_circle_distance, ray_ellipsoid_intersection,
};
use crate::config::SimulationConfig;
use crate::types::{DEG_TO_RAD, FALLBACK_DISTANCE, MIN_ANIMATION_DURATION, SimulationParameters};

/// One point of the descent path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    /// Elapsed animation time since entry (seconds)
    pub time: f64,
    /// ECEF position (meters)
    pub position: DVec3,
    /// Geodetic position of the same point
    pub geodetic: Geodetic,
}

/// Time-ordered descent path from the entry altitude to the ground.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    pub samples: Vec<TrajectorySample>,
    /// Time at which the last sample is reached (seconds)
    pub duration: f64,
    /// Straight-line (or along-path) distance covered (meters)
    pub total_distance: f64,
}

impl Trajectory {
    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Surface distance between the first and last samples (meters).
    pub fn ground_track_length(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => great_circle_distance(
                a.geodetic.latitude,
                a.geodetic.longitude,
                b.geodetic.latitude,
                b.geodetic.longitude,
            ),
            _ => 0.0,
        }
    }

    /// Every `stride`-th ECEF position plus the final one, for polyline rendering.
    pub fn thinned_positions(&self, stride: usize) -> Vec<DVec3> {
        let stride = stride.max(1);
        let mut positions: Vec<DVec3> = self
            .samples
            .iter()
            .step_by(stride)
            .map(|s| s.position)
            .collect();
        if let Some(last) = self.last() {
            if (self.samples.len() - 1) % stride != 0 {
                positions.push(last.position);
            }
        }
        positions
    }
}

/// Analytically computed end of the descent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactPoint {
    /// Impact latitude (degrees)
    pub latitude: f64,
    /// Impact longitude (degrees)
    pub longitude: f64,
    /// Distance travelled from the entry point (meters)
    pub total_distance: f64,
    /// True when the ray missed the ellipsoid and the fixed fallback distance
    /// was used. Such a result is not physical.
    pub fallback: bool,
}

impl ImpactPoint {
    /// Impact coordinate on the ellipsoid surface.
    pub fn geodetic(&self) -> Geodetic {
        Geodetic::new(self.latitude, self.longitude, 0.0)
    }
}

/// Which descent model a run uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryMode {
    /// Straight ECEF line to the ellipsoid (reference model)
    #[default]
    Straight,
    /// Great-circle stepping, see [`sample_stepped_trajectory`]
    Stepped { time_step: f64, max_steps: usize },
}

/// Unit descent direction in the local East-North-Up frame.
///
/// # Arguments
/// * `heading` - Compass bearing of travel (degrees)
/// * `entry_angle` - Angle below the local horizontal (degrees)
///
/// Angles at or below zero give a non-negative up component, so the path
/// never reaches the ground and the impact solver falls back.
pub fn entry_direction(heading: f64, entry_angle: f64) -> DVec3 {
    let (sin_h, cos_h) = (heading * DEG_TO_RAD).sin_cos();
    let (sin_a, cos_a) = (entry_angle * DEG_TO_RAD).sin_cos();
    DVec3::new(sin_h * cos_a, cos_h * cos_a, -sin_a)
}

/// Entry point and unit ECEF direction of the straight descent ray.
fn entry_ray(
    entry_lat: f64,
    entry_lon: f64,
    entry_altitude: f64,
    direction: DVec3,
) -> (DVec3, DVec3) {
    let origin = geodetic_to_ecef(entry_lat, entry_lon, entry_altitude);
    let dir = enu_basis(entry_lat, entry_lon)
        .to_ecef(direction)
        .normalize_or_zero();
    (origin, dir)
}

/// Intersect the descent ray with the ellipsoid.
///
/// # Arguments
/// * `entry_lat`, `entry_lon` - Entry point (degrees)
/// * `entry_altitude` - Height of the entry point (meters)
/// * `direction` - Descent direction in ENU, see [`entry_direction`]
///
/// # Returns
/// The decoded impact coordinate and the distance to it. When the ray never
/// meets the ground the distance is [`FALLBACK_DISTANCE`] and `fallback` is set.
pub fn compute_impact_point(
    entry_lat: f64,
    entry_lon: f64,
    entry_altitude: f64,
    direction: DVec3,
) -> ImpactPoint {
    compute_impact_point_with_fallback(
        entry_lat,
        entry_lon,
        entry_altitude,
        direction,
        FALLBACK_DISTANCE,
    )
}

/// [`compute_impact_point`] with a custom fallback path length (meters).
pub fn compute_impact_point_with_fallback(
    entry_lat: f64,
    entry_lon: f64,
    entry_altitude: f64,
    direction: DVec3,
    fallback_distance: f64,
) -> ImpactPoint {
    let (origin, dir) = entry_ray(entry_lat, entry_lon, entry_altitude, direction);

    let (total_distance, fallback) = match ray_ellipsoid_intersection(origin, dir) {
        Some(distance) => (distance, false),
        None => {
            warn!(
                "Entry ray from ({:.3}, {:.3}) never reaches the ground, using {} km fallback",
                entry_lat,
                entry_lon,
                fallback_distance / 1000.0
            );
            (fallback_distance, true)
        }
    };

    let hit = ecef_to_geodetic(origin + dir * total_distance);

    ImpactPoint {
        latitude: hit.latitude,
        longitude: hit.longitude,
        total_distance,
        fallback,
    }
}

/// Animation length for a path: the physical flight time, but never
/// shorter than [`MIN_ANIMATION_DURATION`].
pub fn animation_duration(total_distance: f64, speed_km_s: f64) -> f64 {
    animation_duration_at_least(total_distance, speed_km_s, MIN_ANIMATION_DURATION)
}

pub fn animation_duration_at_least(total_distance: f64, speed_km_s: f64, minimum: f64) -> f64 {
    let speed = speed_km_s * 1000.0;
    if speed > 0.0 && total_distance.is_finite() {
        (total_distance / speed).max(minimum)
    } else {
        minimum
    }
}

/// Sample the straight descent segment.
///
/// Produces `sample_count + 1` samples evenly spaced in distance, timed
/// over `duration` seconds (see [`animation_duration`]). The last sample is
/// replaced by the impact coordinate on the surface so the path endpoint and
/// the impact marker agree exactly.
pub fn sample_trajectory(
    entry: Geodetic,
    direction: DVec3,
    impact: &ImpactPoint,
    duration: f64,
    sample_count: usize,
) -> Trajectory {
    let steps = sample_count.max(1);
    let (origin, dir) = entry_ray(entry.latitude, entry.longitude, entry.height, direction);

    let mut samples = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        let progress = i as f64 / steps as f64;
        let position = origin + dir * (progress * impact.total_distance);
        samples.push(TrajectorySample {
            time: progress * duration,
            position,
            geodetic: ecef_to_geodetic(position),
        });
    }

    let landing = impact.geodetic();
    samples.push(TrajectorySample {
        time: duration,
        position: landing.to_ecef(),
        geodetic: landing,
    });

    Trajectory {
        samples,
        duration,
        total_distance: impact.total_distance,
    }
}

/// Solve and sample the straight-line entry for a parameter set.
pub fn solve_straight_entry(
    params: &SimulationParameters,
    config: &SimulationConfig,
) -> (ImpactPoint, Trajectory) {
    let direction = entry_direction(params.heading, params.entry_angle);
    let impact = compute_impact_point_with_fallback(
        params.entry_latitude,
        params.entry_longitude,
        params.entry_altitude,
        direction,
        config.fallback_distance,
    );
    let duration = animation_duration_at_least(
        impact.total_distance,
        params.speed,
        config.min_animation_duration,
    );
    let entry = Geodetic::new(params.entry_latitude, params.entry_longitude, params.entry_altitude);
    let trajectory = sample_trajectory(entry, direction, &impact, duration, config.sample_count);
    (impact, trajectory)
}

/// Solve the entry with the model selected in `config`.
///
/// In stepped mode the impact point is the last sample; a path that is
/// still airborne after `max_steps` is flagged as a fallback.
pub fn solve_entry(
    params: &SimulationParameters,
    config: &SimulationConfig,
) -> (ImpactPoint, Trajectory) {
    match config.trajectory_mode {
        TrajectoryMode::Straight => solve_straight_entry(params, config),
        TrajectoryMode::Stepped { time_step, max_steps } => {
            let trajectory = sample_stepped_trajectory(params, time_step, max_steps);
            let entry = Geodetic::new(
                params.entry_latitude,
                params.entry_longitude,
                params.entry_altitude,
            );
            let last = trajectory.last().map_or(entry, |s| s.geodetic);
            let fallback = last.height > 0.0;
            if fallback {
                warn!(
                    "Stepped descent from ({:.3}, {:.3}) still airborne after {} steps",
                    params.entry_latitude, params.entry_longitude, max_steps
                );
            }
            let impact = ImpactPoint {
                latitude: last.latitude,
                longitude: last.longitude,
                total_distance: trajectory.total_distance,
                fallback,
            };
            (impact, trajectory)
        }
    }
}

/// Great-circle stepped descent (lower-fidelity mode).
///
/// Advances with ground speed `v·cos(angle)` along the heading and sinks at
/// `v·sin(angle)`. Each sample is placed from the entry point directly, so
/// no step error accumulates. The final step is shortened to land exactly on
/// the ground. Paths that never descend stop after `max_steps`, and an
/// entry at or below the ground yields the entry sample alone.
pub fn sample_stepped_trajectory(
    params: &SimulationParameters,
    time_step: f64,
    max_steps: usize,
) -> Trajectory {
    let speed = params.speed_m_per_s().max(0.0);
    let (sin_a, cos_a) = (params.entry_angle * DEG_TO_RAD).sin_cos();
    let ground_speed = speed * cos_a;
    let descent_rate = speed * sin_a;
    let time_step = if time_step > 0.0 { time_step } else { 1.0 };

    let point_at = |t: f64, altitude: f64| -> TrajectorySample {
        let (lat, lon) = forward_geodesic(
            params.entry_latitude,
            params.entry_longitude,
            params.heading,
            ground_speed * t,
        );
        let geodetic = Geodetic::new(lat, lon, altitude);
        TrajectorySample {
            time: t,
            position: geodetic.to_ecef(),
            geodetic,
        }
    };

    // An entry at or below the ground has already landed
    let max_steps = if params.entry_altitude > 0.0 { max_steps } else { 0 };

    let mut samples = vec![point_at(0.0, params.entry_altitude)];
    for step in 1..=max_steps {
        let t = step as f64 * time_step;
        let altitude = params.entry_altitude - descent_rate * t;
        if descent_rate > 0.0 && altitude <= 0.0 {
            samples.push(point_at(params.entry_altitude / descent_rate, 0.0));
            break;
        }
        samples.push(point_at(t, altitude));
    }

    let duration = samples.last().map_or(0.0, |s| s.time);
    Trajectory {
        samples,
        duration,
        total_distance: speed * duration,
    }
}
