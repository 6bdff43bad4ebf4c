//! Meteorfall - Meteor Impact Simulation
//!
//! Runs one impact scenario headless and logs the outcome. Usage:
//!
//! ```text
//! meteorfall [scenario.yaml]
//! ```

use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use meteorfall::config::Scenario;
use meteorfall::heat_disk::{DEFAULT_HEAT_COLOR, HeatDiskCache};
use meteorfall::narrative::NarrativeRequest;
use meteorfall::rings::DamageZone;
use meteorfall::simulation::{ImpactPlugin, LatestSimulation, PendingSimulation};

/// Edge length of the heat disk image prepared for the renderer (pixels).
const HEAT_DISK_SIZE: u32 = 256;

fn main() -> ExitCode {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));

    let scenario = match std::env::args().nth(1) {
        Some(path) => match Scenario::load(&path) {
            Ok(scenario) => {
                info!("Loaded scenario {}", path);
                scenario
            }
            Err(e) => {
                error!("Cannot load {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut scenario = Scenario::default();
            scenario.services.fill_from_env();
            scenario
        }
    };

    if scenario.services.globe_access_token.is_none() {
        warn!("No globe access token configured; the renderer will use its default imagery");
    }

    // Insert resources before plugins that depend on them
    app.insert_resource(scenario.simulation.clone())
        .add_plugins(ImpactPlugin);
    app.world_mut()
        .resource_mut::<PendingSimulation>()
        .run(scenario.parameters);
    app.update();

    let Some(run) = app.world_mut().resource_mut::<LatestSimulation>().run.take() else {
        error!("Simulation produced no result");
        return ExitCode::FAILURE;
    };

    if run.impact.fallback {
        warn!("Entry never reaches the ground; impact point is nominal");
    }
    for ring in &run.rings {
        info!("{:<28} {:>9.2} km", ring.zone.label(), ring.radius_km);
    }
    info!(
        "Crater {:.2} km, seismic magnitude {:.1}, flight {:.1} s over {:.0} km",
        run.result.crater_diameter_km,
        run.result.seismic_magnitude,
        run.trajectory.duration,
        run.impact.total_distance / 1000.0
    );
    info!(
        "Camera heights: follow {:.0} km, overview {:.0} km",
        run.follow_height() / 1000.0,
        run.overview_height() / 1000.0
    );

    if run.rings.iter().any(|r| r.zone == DamageZone::Thermal) {
        let mut cache = app.world_mut().resource_mut::<HeatDiskCache>();
        match cache.get_or_render(HEAT_DISK_SIZE, DEFAULT_HEAT_COLOR) {
            Ok(image) => debug!("Heat disk ready ({}x{})", image.width(), image.height()),
            Err(e) => warn!("Heat disk unavailable: {}", e),
        }
    }

    match NarrativeRequest::new(&run.result, &run.parameters, None).to_json() {
        Ok(json) => debug!("Narrative request: {}", json),
        Err(e) => warn!("Cannot encode narrative request: {}", e),
    }

    ExitCode::SUCCESS
}
