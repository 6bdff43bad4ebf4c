//! Near-Earth-object catalog adapter.
//!
//! Turns a NeoWs-style feed document into impactor candidates that can seed
//! a simulation. Fetching the feed is the catalog client's job; this module
//! only understands the payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::SimulationParameters;

/// Diameter bounds applied to catalog objects (meters).
pub const CATALOG_DIAMETER_RANGE: (f64, f64) = (10.0, 2000.0);

/// Speed bounds applied to catalog objects (km/s).
pub const CATALOG_SPEED_RANGE: (f64, f64) = (11.0, 72.0);

/// Density assumed for catalog objects (stony S-type, kg/m³).
pub const CATALOG_DEFAULT_DENSITY: f64 = 3000.0;

/// Diameter used when the record has no usable estimate (km).
const DEFAULT_DIAMETER_KM: f64 = 0.1;

/// Speed used when the feed has no close approach (km/s).
const DEFAULT_SPEED_KM_S: f64 = 20.0;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("malformed catalog payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct NeoFeed {
    #[serde(default)]
    near_earth_objects: BTreeMap<String, Vec<NeoRecord>>,
}

/// One object as it appears in the feed.
#[derive(Debug, Deserialize)]
pub struct NeoRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: bool,
    pub absolute_magnitude_h: Option<f64>,
    pub estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Deserialize)]
pub struct EstimatedDiameter {
    pub kilometers: Option<DiameterRange>,
    pub meters: Option<DiameterRange>,
}

/// Either bound may be missing or null in partial records.
#[derive(Debug, Deserialize)]
pub struct DiameterRange {
    pub estimated_diameter_min: Option<f64>,
    pub estimated_diameter_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CloseApproach {
    pub relative_velocity: Option<RelativeVelocity>,
}

/// Velocities arrive as decimal strings.
#[derive(Debug, Deserialize)]
pub struct RelativeVelocity {
    pub kilometers_per_second: Option<String>,
}

/// A catalog object reduced to simulation inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogImpactor {
    pub name: String,
    pub id: String,
    /// Diameter clamped to [`CATALOG_DIAMETER_RANGE`] (meters)
    pub diameter: f64,
    /// Speed clamped to [`CATALOG_SPEED_RANGE`] (km/s)
    pub speed: f64,
    /// Assumed bulk density (kg/m³)
    pub density: f64,
    pub is_potentially_hazardous: bool,
    pub absolute_magnitude: Option<f64>,
    /// Unclamped minimum size estimate (meters)
    pub estimated_diameter_min: Option<f64>,
    /// Unclamped maximum size estimate (meters)
    pub estimated_diameter_max: Option<f64>,
}

impl CatalogImpactor {
    /// Reduce a feed record, applying defaults and clamping to the simulated ranges.
    pub fn from_record(record: &NeoRecord) -> Self {
        let diameter_km = record
            .estimated_diameter
            .as_ref()
            .and_then(|d| d.kilometers.as_ref())
            .and_then(|k| k.estimated_diameter_max)
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(DEFAULT_DIAMETER_KM);

        let speed = record
            .close_approach_data
            .first()
            .and_then(|a| a.relative_velocity.as_ref())
            .and_then(|v| v.kilometers_per_second.as_deref())
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_SPEED_KM_S);

        let meters = record.estimated_diameter.as_ref().and_then(|d| d.meters.as_ref());

        Self {
            name: record.name.clone(),
            id: record.id.clone(),
            diameter: (diameter_km * 1000.0)
                .clamp(CATALOG_DIAMETER_RANGE.0, CATALOG_DIAMETER_RANGE.1),
            speed: speed.clamp(CATALOG_SPEED_RANGE.0, CATALOG_SPEED_RANGE.1),
            density: CATALOG_DEFAULT_DENSITY,
            is_potentially_hazardous: record.is_potentially_hazardous_asteroid,
            absolute_magnitude: record.absolute_magnitude_h,
            estimated_diameter_min: meters.and_then(|m| m.estimated_diameter_min),
            estimated_diameter_max: meters.and_then(|m| m.estimated_diameter_max),
        }
    }

    /// Replace the impactor properties of `base`, keeping its entry geometry.
    pub fn apply_to(&self, base: SimulationParameters) -> SimulationParameters {
        SimulationParameters {
            diameter: self.diameter,
            speed: self.speed,
            density: self.density,
            ..base
        }
    }
}

/// Parse a feed document into candidates, largest first.
pub fn parse_feed(json: &str) -> Result<Vec<CatalogImpactor>, CatalogError> {
    let feed: NeoFeed = serde_json::from_str(json)?;

    let mut impactors: Vec<CatalogImpactor> = feed
        .near_earth_objects
        .values()
        .flatten()
        .map(CatalogImpactor::from_record)
        .collect();
    impactors.sort_by(|a, b| b.diameter.total_cmp(&a.diameter));
    Ok(impactors)
}

/// Parse a single-object lookup document.
pub fn parse_record(json: &str) -> Result<CatalogImpactor, CatalogError> {
    let record: NeoRecord = serde_json::from_str(json)?;
    Ok(CatalogImpactor::from_record(&record))
}
