//! Scenario files and runtime configuration.
//!
//! A scenario YAML file bundles the impactor parameters, simulation tunables
//! and external service settings. Every section is optional:
//!
//! ```yaml
//! parameters:
//!   entry_latitude: 40.7
//!   entry_longitude: -74.0
//!   diameter: 300
//! simulation:
//!   sample_count: 500
//!   ring_segments: !fixed 72
//!   trajectory_mode: !stepped { time_step: 0.5, max_steps: 2000 }
//! services:
//!   catalog_base_url: https://api.nasa.gov/neo/rest/v1
//! ```

use std::path::Path;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::rings::RingSegments;
use crate::trajectory::TrajectoryMode;
use crate::types::{
    DEFAULT_SAMPLE_COUNT, FALLBACK_DISTANCE, MIN_ANIMATION_DURATION, MIN_RING_RADIUS_KM,
    SimulationParameters,
};

const DEFAULT_CATALOG_BASE_URL: &str = "https://api.nasa.gov/neo/rest/v1";

const DEFAULT_NARRATIVE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash";

/// Environment variable consulted for the catalog API key.
pub const CATALOG_API_KEY_VAR: &str = "METEORFALL_CATALOG_API_KEY";

/// Environment variable consulted for the narrative API key.
pub const NARRATIVE_API_KEY_VAR: &str = "METEORFALL_NARRATIVE_API_KEY";

/// Environment variable consulted for the globe access token.
pub const GLOBE_TOKEN_VAR: &str = "METEORFALL_GLOBE_TOKEN";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// Tunables of one simulation run.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of trajectory intervals (the path has one more sample)
    pub sample_count: usize,
    /// Shortest animation length (seconds)
    pub min_animation_duration: f64,
    /// Path length used when the entry ray misses the ground (meters)
    pub fallback_distance: f64,
    /// Rings below this radius are not drawn (km)
    pub min_ring_radius_km: f64,
    pub ring_segments: RingSegments,
    pub trajectory_mode: TrajectoryMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            min_animation_duration: MIN_ANIMATION_DURATION,
            fallback_distance: FALLBACK_DISTANCE,
            min_ring_radius_km: MIN_RING_RADIUS_KM,
            ring_segments: RingSegments::Adaptive,
            trajectory_mode: TrajectoryMode::Straight,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_count == 0 {
            return Err(ConfigError::Invalid("sample_count must be at least 1".into()));
        }
        if !(self.min_animation_duration.is_finite() && self.min_animation_duration >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_animation_duration must be non-negative, got {}",
                self.min_animation_duration
            )));
        }
        if !(self.fallback_distance.is_finite() && self.fallback_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fallback_distance must be positive, got {}",
                self.fallback_distance
            )));
        }
        if self.min_ring_radius_km.is_nan() || self.min_ring_radius_km < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_ring_radius_km must be non-negative, got {}",
                self.min_ring_radius_km
            )));
        }
        if let TrajectoryMode::Stepped { time_step, max_steps } = self.trajectory_mode {
            if !(time_step.is_finite() && time_step > 0.0) || max_steps == 0 {
                return Err(ConfigError::Invalid(format!(
                    "stepped mode needs a positive time_step and max_steps, got {} and {}",
                    time_step, max_steps
                )));
            }
        }
        Ok(())
    }
}

/// Settings for the external collaborators.
///
/// Only passed to whoever initializes the catalog, narrative and globe
/// clients; the simulation itself never reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub catalog_base_url: String,
    pub catalog_api_key: Option<String>,
    pub narrative_url: String,
    pub narrative_api_key: Option<String>,
    pub globe_access_token: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            catalog_api_key: None,
            narrative_url: DEFAULT_NARRATIVE_URL.to_string(),
            narrative_api_key: None,
            globe_access_token: None,
        }
    }
}

impl ServiceConfig {
    /// Fill missing credentials from the process environment.
    pub fn fill_from_env(&mut self) {
        self.fill_from(|name| std::env::var(name).ok());
    }

    /// Fill missing credentials from `lookup`. Values already set win.
    pub fn fill_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fetch = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if self.catalog_api_key.is_none() {
            self.catalog_api_key = fetch(CATALOG_API_KEY_VAR);
        }
        if self.narrative_api_key.is_none() {
            self.narrative_api_key = fetch(NARRATIVE_API_KEY_VAR);
        }
        if self.globe_access_token.is_none() {
            self.globe_access_token = fetch(GLOBE_TOKEN_VAR);
        }
    }

    /// Catalog feed URL for a date window (`YYYY-MM-DD`).
    ///
    /// Falls back to the public demo key when no key is configured.
    pub fn catalog_feed_url(&self, start_date: &str, end_date: &str) -> String {
        format!(
            "{}/feed?start_date={}&end_date={}&api_key={}",
            self.catalog_base_url.trim_end_matches('/'),
            start_date,
            end_date,
            self.catalog_api_key.as_deref().unwrap_or("DEMO_KEY"),
        )
    }

    /// Catalog lookup URL for a single object.
    pub fn catalog_lookup_url(&self, id: &str) -> String {
        format!(
            "{}/neo/{}?api_key={}",
            self.catalog_base_url.trim_end_matches('/'),
            id,
            self.catalog_api_key.as_deref().unwrap_or("DEMO_KEY"),
        )
    }
}

/// Everything one scenario file describes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub parameters: SimulationParameters,
    pub simulation: SimulationConfig,
    pub services: ServiceConfig,
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.simulation.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file and fill service credentials from the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut scenario = Self::from_yaml(&text)?;
        scenario.services.fill_from_env();
        Ok(scenario)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
