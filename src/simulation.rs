//! One simulation run from parameters to renderable results.
//!
//! [`run_simulation`] composes the trajectory solver, the blast model and the
//! ring sampler. [`ImpactPlugin`] exposes it to a Bevy app through
//! resources: write a command into [`PendingSimulation`] and read the outcome
//! from [`LatestSimulation`] after the next update.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::blast::{ImpactEffects, compute_impact_effects};
use crate::config::SimulationConfig;
use crate::framing::{follow_height, overview_height};
use crate::heat_disk::HeatDiskCache;
use crate::rings::{DamageRing, damage_rings};
use crate::trajectory::{ImpactPoint, Trajectory, solve_entry};
use crate::types::SimulationParameters;

/// Outcome of one run, handed to the renderer and the narrative service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    /// Impact latitude (degrees)
    pub latitude: f64,
    /// Impact longitude (degrees)
    pub longitude: f64,
    pub energy_megatons: f64,
    pub energy_kilotons: f64,
    pub radius_20psi_km: f64,
    pub radius_5psi_km: f64,
    pub radius_1psi_km: f64,
    pub radius_thermal_km: f64,
    pub crater_diameter_km: f64,
    pub seismic_magnitude: f64,
    pub mass_kg: f64,
    pub efficiency: f64,
    pub kinetic_energy_joules: f64,
    pub effective_energy_joules: f64,
}

impl ImpactResult {
    pub fn new(impact: &ImpactPoint, effects: &ImpactEffects) -> Self {
        Self {
            latitude: impact.latitude,
            longitude: impact.longitude,
            energy_megatons: effects.energy_megatons,
            energy_kilotons: effects.energy_kilotons,
            radius_20psi_km: effects.radius_20psi_km,
            radius_5psi_km: effects.radius_5psi_km,
            radius_1psi_km: effects.radius_1psi_km,
            radius_thermal_km: effects.radius_thermal_km,
            crater_diameter_km: effects.crater_diameter_km,
            seismic_magnitude: effects.seismic_magnitude,
            mass_kg: effects.mass_kg,
            efficiency: effects.efficiency,
            kinetic_energy_joules: effects.kinetic_energy_joules,
            effective_energy_joules: effects.effective_energy_joules,
        }
    }

    pub fn max_radius_km(&self) -> f64 {
        self.radius_20psi_km
            .max(self.radius_5psi_km)
            .max(self.radius_1psi_km)
            .max(self.radius_thermal_km)
    }
}

/// Everything one run produces.
#[derive(Clone, Debug)]
pub struct SimulationRun {
    pub parameters: SimulationParameters,
    pub impact: ImpactPoint,
    pub trajectory: Trajectory,
    pub result: ImpactResult,
    pub rings: Vec<DamageRing>,
}

impl SimulationRun {
    /// Camera height while following the descent (meters).
    pub fn follow_height(&self) -> f64 {
        follow_height(self.impact.total_distance)
    }

    /// Camera height that frames all rings (meters).
    pub fn overview_height(&self) -> f64 {
        overview_height(self.result.max_radius_km())
    }
}

/// Run the full pipeline for one parameter set.
///
/// Total over its inputs: a path that never reaches the ground is flagged
/// on [`ImpactPoint::fallback`] rather than reported as an error.
pub fn run_simulation(params: &SimulationParameters, config: &SimulationConfig) -> SimulationRun {
    let (impact, trajectory) = solve_entry(params, config);
    let effects = compute_impact_effects(params.diameter, params.density, params.speed);
    let rings = damage_rings(
        impact.latitude,
        impact.longitude,
        &effects,
        config.ring_segments,
        config.min_ring_radius_km,
    );
    let result = ImpactResult::new(&impact, &effects);

    if impact.fallback {
        if params.has_descending_entry() {
            info!(
                "Entry angle {:.1} deg is shallower than the horizon dip, impact is not physical",
                params.entry_angle
            );
        } else {
            info!(
                "Entry angle {:.1} deg points at or above the horizon, impact is not physical",
                params.entry_angle
            );
        }
    }

    debug!(
        "Trajectory: {} samples over {:.1} s, {:.1} km",
        trajectory.len(),
        trajectory.duration,
        trajectory.total_distance / 1000.0
    );
    info!(
        "Impact at ({:.4}, {:.4}): {:.2} Mt, 1 psi radius {:.1} km, {} rings",
        result.latitude,
        result.longitude,
        result.energy_megatons,
        result.radius_1psi_km,
        rings.len()
    );

    SimulationRun {
        parameters: *params,
        impact,
        trajectory,
        result,
        rings,
    }
}

/// A request for the simulation system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimulationCommand {
    /// Replace the latest run with a new one
    Run(SimulationParameters),
    /// Drop the latest run
    Reset,
}

/// Command to process on the next update.
#[derive(Resource, Default, Debug)]
pub struct PendingSimulation(pub Option<SimulationCommand>);

impl PendingSimulation {
    pub fn run(&mut self, params: SimulationParameters) {
        self.0 = Some(SimulationCommand::Run(params));
    }

    pub fn reset(&mut self) {
        self.0 = Some(SimulationCommand::Reset);
    }
}

/// Most recent completed run, replaced wholesale by the next one.
#[derive(Resource, Default, Debug)]
pub struct LatestSimulation {
    pub run: Option<SimulationRun>,
    /// Runs completed since startup
    pub completed: u32,
}

/// Plugin wiring the simulation into a Bevy app.
pub struct ImpactPlugin;

impl Plugin for ImpactPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationConfig>()
            .init_resource::<PendingSimulation>()
            .init_resource::<LatestSimulation>()
            .init_resource::<HeatDiskCache>()
            .add_systems(Update, process_pending_simulation);
    }
}

/// Consume the pending command, if any.
fn process_pending_simulation(
    mut pending: ResMut<PendingSimulation>,
    mut latest: ResMut<LatestSimulation>,
    config: Res<SimulationConfig>,
) {
    let Some(command) = pending.0.take() else {
        return;
    };

    match command {
        SimulationCommand::Run(params) => {
            latest.run = Some(run_simulation(&params, &config));
            latest.completed += 1;
        }
        SimulationCommand::Reset => {
            if latest.run.take().is_some() {
                info!("Simulation reset");
            }
        }
    }
}
