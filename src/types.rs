//! Core physical constants and simulation input types.

use serde::{Deserialize, Serialize};

/// Physical constants (SI units)

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees conversion factor
pub const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Mean Earth radius used for spherical great-circle math (meters)
pub const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

/// WGS84 semi-major axis (meters)
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257223563;

/// WGS84 semi-minor axis (meters)
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

/// WGS84 first eccentricity squared
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Altitude where the simulated descent begins (meters)
pub const ENTRY_ALTITUDE: f64 = 100_000.0;

/// Energy of one megaton of TNT (joules)
pub const JOULES_PER_MEGATON: f64 = 4.184e15;

/// Distance travelled when the entry ray never meets the ellipsoid (meters)
pub const FALLBACK_DISTANCE: f64 = 1_000_000.0;

/// Shortest animation the renderer is given, even for fast impacts (seconds)
pub const MIN_ANIMATION_DURATION: f64 = 5.0;

/// Default number of interpolation steps along the entry path
pub const DEFAULT_SAMPLE_COUNT: usize = 250;

/// Damage rings with a smaller radius are not drawn (km)
pub const MIN_RING_RADIUS_KM: f64 = 0.1;

/// Input parameters for one simulation run.
///
/// Angles are in degrees, speed in km/s, diameter in meters and
/// density in kg/m³. Values outside the typical ranges are accepted;
/// the solver stays total over them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Latitude of the entry point (degrees)
    pub entry_latitude: f64,
    /// Longitude of the entry point (degrees)
    pub entry_longitude: f64,
    /// Compass bearing of travel, clockwise from north (degrees)
    pub heading: f64,
    /// Angle below the local horizontal (degrees). Typical: 5-85.
    pub entry_angle: f64,
    /// Entry speed (km/s). Typical: 11-72.
    pub speed: f64,
    /// Impactor diameter (meters). Typical: 10-2000.
    pub diameter: f64,
    /// Impactor bulk density (kg/m³). Typical: 500-8000.
    pub density: f64,
    /// Height above the ellipsoid where the descent starts (meters)
    pub entry_altitude: f64,
}

impl Default for SimulationParameters {
    /// Stony 120 m impactor entering over La Paz, heading east-north-east.
    fn default() -> Self {
        Self {
            entry_latitude: -16.5,
            entry_longitude: -68.15,
            heading: 80.0,
            entry_angle: 25.0,
            speed: 18.0,
            diameter: 120.0,
            density: 3000.0,
            entry_altitude: ENTRY_ALTITUDE,
        }
    }
}

impl SimulationParameters {
    /// Entry speed in m/s
    pub fn speed_m_per_s(&self) -> f64 {
        self.speed * 1000.0
    }

    /// Whether the entry angle points below the local horizontal.
    ///
    /// Runs outside this range still complete, using the fallback distance.
    pub fn has_descending_entry(&self) -> bool {
        self.entry_angle > 0.0 && self.entry_angle <= 90.0
    }
}
