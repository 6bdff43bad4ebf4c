//! Blast and energy model for a ground-impacting body.
//!
//! Converts impactor diameter, density and speed into:
//! - Kinetic energy and an atmospheric-coupling efficiency
//! - Overpressure radii for 20, 5 and 1 psi via cube-root yield scaling
//! - Thermal radiation radius via square-root yield scaling
//! - Crater diameter and seismic magnitude
//!
//! This is a coarse empirical model. The efficiency breakpoints and scaling
//! constants below are fixed so results are reproducible across runs.

#[cfg(test)]
mod proptest_blast;

use serde::{Deserialize, Serialize};

use crate::types::JOULES_PER_MEGATON;

/// 20 psi radius coefficient (km per kt^1/3).
pub const C_20PSI: f64 = 0.12;

/// 5 psi radius coefficient (km per kt^1/3).
pub const C_5PSI: f64 = 0.24;

/// 1 psi radius coefficient (km per kt^1/3).
pub const C_1PSI: f64 = 0.48;

/// Thermal radius coefficient (km per kt^1/2).
pub const C_THERMAL: f64 = 0.35;

/// Fraction of the yield emitted as thermal radiation.
pub const THERMAL_FRACTION: f64 = 0.3;

/// Fraction of thermal radiation transmitted through the atmosphere.
pub const ATMOSPHERIC_TRANSMISSION: f64 = 0.7;

/// Reference target density for crater scaling (kg/m³).
pub const CRATER_REFERENCE_DENSITY: f64 = 2500.0;

/// Crater scaling prefactor (meters).
pub const CRATER_COEFFICIENT: f64 = 1.8;

/// Exponent applied to both speed (km/s) and diameter (m) in crater scaling.
pub const CRATER_EXPONENT: f64 = 0.78;

/// Energy and damage metrics of one impact, independent of where it lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactEffects {
    /// Impactor mass (kg)
    pub mass_kg: f64,
    /// Raw kinetic energy at entry speed (J)
    pub kinetic_energy_joules: f64,
    /// Fraction of kinetic energy delivered as blast energy (0-1)
    pub efficiency: f64,
    /// Effective blast energy (J)
    pub effective_energy_joules: f64,
    /// Effective blast energy (megatons TNT)
    pub energy_megatons: f64,
    /// Effective blast energy (kilotons TNT)
    pub energy_kilotons: f64,
    /// Total destruction radius (km)
    pub radius_20psi_km: f64,
    /// Severe damage radius (km)
    pub radius_5psi_km: f64,
    /// Moderate damage radius (km)
    pub radius_1psi_km: f64,
    /// Severe burn radius (km)
    pub radius_thermal_km: f64,
    /// Final crater diameter (km)
    pub crater_diameter_km: f64,
    /// Richter-scale equivalent, clamped to [0, 10]
    pub seismic_magnitude: f64,
}

impl ImpactEffects {
    /// Largest of the damage radii (km).
    pub fn max_radius_km(&self) -> f64 {
        self.radius_20psi_km
            .max(self.radius_5psi_km)
            .max(self.radius_1psi_km)
            .max(self.radius_thermal_km)
    }
}

/// Treat negative, NaN and infinite inputs as zero so the model stays total.
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Mass of a homogeneous sphere (kg).
pub fn sphere_mass(diameter_m: f64, density: f64) -> f64 {
    let r = diameter_m / 2.0;
    (4.0 / 3.0) * std::f64::consts::PI * r.powi(3) * density
}

/// Fraction of kinetic energy that reaches the ground as blast energy.
///
/// Smaller bodies lose more of their energy to deceleration and ablation
/// on the way down:
/// - d < 50 m: 0.05
/// - 50 ≤ d < 200 m: 0.15
/// - 200 ≤ d < 1000 m: 0.25
/// - d ≥ 1000 m: 0.35
pub fn atmospheric_efficiency(diameter_m: f64) -> f64 {
    if diameter_m < 50.0 {
        0.05
    } else if diameter_m < 200.0 {
        0.15
    } else if diameter_m < 1000.0 {
        0.25
    } else {
        0.35
    }
}

/// Overpressure radius for a yield using cube-root scaling (km).
pub fn overpressure_radius(coefficient: f64, kilotons: f64) -> f64 {
    coefficient * kilotons.cbrt()
}

/// Thermal radiation radius (km).
pub fn thermal_radius(kilotons: f64) -> f64 {
    C_THERMAL * (kilotons * THERMAL_FRACTION).sqrt() * ATMOSPHERIC_TRANSMISSION.sqrt()
}

/// Final crater diameter (km).
pub fn crater_diameter(diameter_m: f64, density: f64, speed_km_s: f64) -> f64 {
    let density_ratio = (density / CRATER_REFERENCE_DENSITY).cbrt();
    let velocity_term = speed_km_s.powf(CRATER_EXPONENT);
    let size_term = diameter_m.powf(CRATER_EXPONENT);
    CRATER_COEFFICIENT * density_ratio * velocity_term * size_term / 1000.0
}

/// Seismic magnitude from effective energy (Gutenberg-Richter energy relation).
///
/// Zero energy maps to magnitude zero directly instead of evaluating log10(0).
pub fn seismic_magnitude(effective_energy_joules: f64) -> f64 {
    if effective_energy_joules <= 0.0 {
        return 0.0;
    }
    let ergs = effective_energy_joules * 1e7;
    ((ergs.log10() - 11.8) / 1.5).clamp(0.0, 10.0)
}

/// Compute energy and damage metrics for an impactor.
///
/// # Arguments
/// * `diameter_m` - Impactor diameter (meters)
/// * `density` - Bulk density (kg/m³)
/// * `speed_km_s` - Speed at entry (km/s)
///
/// Zero, negative or non-finite inputs produce zero energy and zero radii.
pub fn compute_impact_effects(diameter_m: f64, density: f64, speed_km_s: f64) -> ImpactEffects {
    let diameter_m = non_negative(diameter_m);
    let density = non_negative(density);
    let speed_km_s = non_negative(speed_km_s);

    let mass_kg = sphere_mass(diameter_m, density);
    let v = speed_km_s * 1000.0;
    let kinetic_energy_joules = 0.5 * mass_kg * v * v;

    let efficiency = atmospheric_efficiency(diameter_m);
    let effective_energy_joules = kinetic_energy_joules * efficiency;
    let energy_megatons = effective_energy_joules / JOULES_PER_MEGATON;
    let energy_kilotons = energy_megatons * 1000.0;

    ImpactEffects {
        mass_kg,
        kinetic_energy_joules,
        efficiency,
        effective_energy_joules,
        energy_megatons,
        energy_kilotons,
        radius_20psi_km: overpressure_radius(C_20PSI, energy_kilotons),
        radius_5psi_km: overpressure_radius(C_5PSI, energy_kilotons),
        radius_1psi_km: overpressure_radius(C_1PSI, energy_kilotons),
        radius_thermal_km: thermal_radius(energy_kilotons),
        crater_diameter_km: crater_diameter(diameter_m, density, speed_km_s),
        seismic_magnitude: seismic_magnitude(effective_energy_joules),
    }
}
