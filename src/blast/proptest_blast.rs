//! Property-based tests for the blast model using proptest.

use proptest::prelude::*;

use super::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Severity ordering and the 1:2:4 spacing of overpressure radii.
    #[test]
    fn prop_overpressure_radii_ordered(
        diameter in 1.0f64..3000.0,
        density in 500.0f64..8000.0,
        speed in 1.0f64..72.0,
    ) {
        let e = compute_impact_effects(diameter, density, speed);
        prop_assert!(e.energy_kilotons > 0.0);
        prop_assert!(e.radius_20psi_km < e.radius_5psi_km);
        prop_assert!(e.radius_5psi_km < e.radius_1psi_km);
        let doubled = 2.0 * e.radius_20psi_km;
        prop_assert!((e.radius_5psi_km - doubled).abs() <= 1e-12 * e.radius_5psi_km);
        prop_assert!((e.radius_1psi_km - 2.0 * e.radius_5psi_km).abs() <= 1e-12 * e.radius_1psi_km);
    }

    /// A larger body never releases less energy or does less damage.
    #[test]
    fn prop_monotonic_in_diameter(
        diameter in 0.0f64..2500.0,
        growth in 0.0f64..500.0,
        density in 500.0f64..8000.0,
        speed in 11.0f64..72.0,
    ) {
        let small = compute_impact_effects(diameter, density, speed);
        let large = compute_impact_effects(diameter + growth, density, speed);

        prop_assert!(large.effective_energy_joules >= small.effective_energy_joules);
        prop_assert!(large.radius_20psi_km >= small.radius_20psi_km);
        prop_assert!(large.radius_5psi_km >= small.radius_5psi_km);
        prop_assert!(large.radius_1psi_km >= small.radius_1psi_km);
        prop_assert!(large.radius_thermal_km >= small.radius_thermal_km);
        prop_assert!(large.crater_diameter_km >= small.crater_diameter_km);
        prop_assert!(large.seismic_magnitude >= small.seismic_magnitude);
    }

    /// Zero diameter is safe for any density and speed.
    #[test]
    fn prop_zero_diameter_yields_zero(
        density in 0.0f64..10_000.0,
        speed in 0.0f64..100.0,
    ) {
        let e = compute_impact_effects(0.0, density, speed);
        prop_assert_eq!(e.energy_megatons, 0.0);
        prop_assert_eq!(e.max_radius_km(), 0.0);
        prop_assert_eq!(e.seismic_magnitude, 0.0);
    }

    /// All outputs stay finite and non-negative over the typical input ranges.
    #[test]
    fn prop_outputs_finite_and_non_negative(
        diameter in 0.0f64..2000.0,
        density in 0.0f64..8000.0,
        speed in 0.0f64..72.0,
    ) {
        let e = compute_impact_effects(diameter, density, speed);
        for value in [
            e.mass_kg,
            e.energy_megatons,
            e.radius_20psi_km,
            e.radius_5psi_km,
            e.radius_1psi_km,
            e.radius_thermal_km,
            e.crater_diameter_km,
        ] {
            prop_assert!(value.is_finite() && value >= 0.0, "bad value {}", value);
        }
        prop_assert!((0.0..=10.0).contains(&e.seismic_magnitude));
    }
}
