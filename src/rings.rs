//! Damage-ring boundaries on the sphere.
//!
//! Each ring is a closed polygon of `(latitude, longitude)` points placed at
//! evenly spaced bearings around the impact point using the forward geodesic.

use serde::{Deserialize, Serialize};

use crate::blast::ImpactEffects;
use crate::geodesy::forward_geodesic;

/// Fewest segments a ring may have.
pub const MIN_RING_SEGMENTS: usize = 24;

/// Damage thresholds drawn around an impact, most severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageZone {
    /// 20 psi: total destruction
    Severe20Psi,
    /// 5 psi: most buildings collapse
    Heavy5Psi,
    /// 1 psi: windows shatter, light damage
    Light1Psi,
    /// Third-degree burns
    Thermal,
}

/// RGBA8 colours for drawing a ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingStyle {
    pub fill: [u8; 4],
    pub outline: [u8; 4],
}

/// Scale a 0-1 opacity to a byte.
const fn alpha(a: f32) -> u8 {
    (a * 255.0 + 0.5) as u8
}

impl DamageZone {
    pub const ALL: [DamageZone; 4] = [
        DamageZone::Severe20Psi,
        DamageZone::Heavy5Psi,
        DamageZone::Light1Psi,
        DamageZone::Thermal,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DamageZone::Severe20Psi => "20 psi (total destruction)",
            DamageZone::Heavy5Psi => "5 psi (severe damage)",
            DamageZone::Light1Psi => "1 psi (moderate damage)",
            DamageZone::Thermal => "Thermal (severe burns)",
        }
    }

    /// Radius of this zone for a given set of effects (km).
    pub fn radius_km(&self, effects: &ImpactEffects) -> f64 {
        match self {
            DamageZone::Severe20Psi => effects.radius_20psi_km,
            DamageZone::Heavy5Psi => effects.radius_5psi_km,
            DamageZone::Light1Psi => effects.radius_1psi_km,
            DamageZone::Thermal => effects.radius_thermal_km,
        }
    }

    /// Fill and outline colours used by the globe renderer.
    pub fn style(&self) -> RingStyle {
        match self {
            DamageZone::Severe20Psi => RingStyle {
                fill: [0x8b, 0x00, 0x00, alpha(0.3)],
                outline: [0xff, 0x00, 0x00, alpha(0.5)],
            },
            DamageZone::Heavy5Psi => RingStyle {
                fill: [0xff, 0x2d, 0x2d, alpha(0.2)],
                outline: [0xff, 0x2d, 0x2d, alpha(0.5)],
            },
            DamageZone::Light1Psi => RingStyle {
                fill: [0xff, 0x99, 0x00, alpha(0.15)],
                outline: [0xff, 0x99, 0x00, alpha(0.5)],
            },
            DamageZone::Thermal => RingStyle {
                fill: [0xff, 0x8c, 0x00, alpha(0.8)],
                outline: [0xff, 0x78, 0x00, 0],
            },
        }
    }
}

/// How many segments to use for ring boundaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingSegments {
    /// Fewer segments for small rings, see [`adaptive_segment_count`]
    #[default]
    Adaptive,
    /// Same count for every ring (raised to at least [`MIN_RING_SEGMENTS`])
    Fixed(usize),
}

impl RingSegments {
    pub fn count_for(&self, radius_km: f64) -> usize {
        match *self {
            RingSegments::Adaptive => adaptive_segment_count(radius_km),
            RingSegments::Fixed(n) => n.max(MIN_RING_SEGMENTS),
        }
    }
}

/// Segment count by ring size: 60 below 5 km, 90 below 20 km, 120 otherwise.
pub fn adaptive_segment_count(radius_km: f64) -> usize {
    if radius_km < 5.0 {
        60
    } else if radius_km < 20.0 {
        90
    } else {
        120
    }
}

/// A renderable damage ring.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DamageRing {
    pub zone: DamageZone,
    pub radius_km: f64,
    /// Closed boundary: the first and last points coincide
    pub boundary: Vec<(f64, f64)>,
}

/// Closed ring of `segments + 1` points at a fixed surface distance.
///
/// # Arguments
/// * `center_lat`, `center_lon` - Ring center (degrees)
/// * `radius_km` - Surface distance from the center (km)
/// * `segments` - Number of edges; raised to [`MIN_RING_SEGMENTS`] if smaller
pub fn circle_boundary(
    center_lat: f64,
    center_lon: f64,
    radius_km: f64,
    segments: usize,
) -> Vec<(f64, f64)> {
    let segments = segments.max(MIN_RING_SEGMENTS);
    let distance = radius_km * 1000.0;

    let mut points: Vec<(f64, f64)> = (0..segments)
        .map(|i| {
            let bearing = 360.0 * i as f64 / segments as f64;
            forward_geodesic(center_lat, center_lon, bearing, distance)
        })
        .collect();
    // Close the ring exactly rather than recomputing bearing 360
    points.push(points[0]);
    points
}

/// Rings for every damage zone whose radius is at least `min_radius_km`.
pub fn damage_rings(
    center_lat: f64,
    center_lon: f64,
    effects: &ImpactEffects,
    segments: RingSegments,
    min_radius_km: f64,
) -> Vec<DamageRing> {
    DamageZone::ALL
        .iter()
        .filter_map(|&zone| {
            let radius_km = zone.radius_km(effects);
            if radius_km.is_nan() || radius_km < min_radius_km {
                return None;
            }
            Some(DamageRing {
                zone,
                radius_km,
                boundary: circle_boundary(
                    center_lat,
                    center_lon,
                    radius_km,
                    segments.count_for(radius_km),
                ),
            })
        })
        .collect()
}
