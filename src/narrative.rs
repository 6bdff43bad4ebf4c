//! Hand-off records for the impact narrative service.
//!
//! The core sends a flat [`NarrativeRequest`] describing the impact and
//! receives free text that should contain a JSON document. The reply is only
//! extracted, lightly repaired and presence-checked here; its numbers are
//! never validated.

use std::f64::consts::PI;

use serde::{Deserialize, Deserializer, Serialize};

use crate::simulation::ImpactResult;
use crate::types::SimulationParameters;

#[derive(thiserror::Error, Debug)]
pub enum NarrativeError {
    #[error("narrative reply contained no JSON document")]
    Empty,

    #[error("narrative reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("narrative reply is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Everything the narrative service needs about one impact, as a flat record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub energy_megatons: f64,
    pub energy_kilotons: f64,
    pub effective_energy_joules: f64,
    pub radius_20psi_km: f64,
    pub radius_5psi_km: f64,
    pub radius_1psi_km: f64,
    pub radius_thermal_km: f64,
    pub area_20psi_km2: f64,
    pub area_5psi_km2: f64,
    pub area_1psi_km2: f64,
    pub area_thermal_km2: f64,
    pub crater_diameter_km: f64,
    pub seismic_magnitude: f64,
    pub efficiency: f64,
    pub mass_kg: f64,
    pub diameter: f64,
    pub speed: f64,
    pub density: f64,
    pub entry_angle: f64,
    pub heading: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impactor_name: Option<String>,
}

fn disk_area(radius_km: f64) -> f64 {
    PI * radius_km * radius_km
}

impl NarrativeRequest {
    pub fn new(
        result: &ImpactResult,
        params: &SimulationParameters,
        impactor_name: Option<&str>,
    ) -> Self {
        Self {
            latitude: result.latitude,
            longitude: result.longitude,
            energy_megatons: result.energy_megatons,
            energy_kilotons: result.energy_kilotons,
            effective_energy_joules: result.effective_energy_joules,
            radius_20psi_km: result.radius_20psi_km,
            radius_5psi_km: result.radius_5psi_km,
            radius_1psi_km: result.radius_1psi_km,
            radius_thermal_km: result.radius_thermal_km,
            area_20psi_km2: disk_area(result.radius_20psi_km),
            area_5psi_km2: disk_area(result.radius_5psi_km),
            area_1psi_km2: disk_area(result.radius_1psi_km),
            area_thermal_km2: disk_area(result.radius_thermal_km),
            crater_diameter_km: result.crater_diameter_km,
            seismic_magnitude: result.seismic_magnitude,
            efficiency: result.efficiency,
            mass_kg: result.mass_kg,
            diameter: params.diameter,
            speed: params.speed,
            density: params.density,
            entry_angle: params.entry_angle,
            heading: params.heading,
            impactor_name: impactor_name.map(str::to_owned),
        }
    }

    pub fn to_json(&self) -> Result<String, NarrativeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Reads a missing or null value as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeLocation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedCity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub distance: Option<f64>,
    pub population: Option<f64>,
    pub damage_level: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedCountry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub percentage_affected: Option<f64>,
    /// km²
    pub affected_area: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub major_cities_affected: Vec<AffectedCity>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Casualties {
    pub estimated_deaths: Option<f64>,
    pub estimated_injured: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub breakdown: serde_json::Map<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub methodology: String,
}

/// Structured reply from the narrative service.
///
/// Numeric fields stay `None` when the reply leaves them empty or null.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactNarrative {
    pub location: Option<NarrativeLocation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub affected_countries: Vec<AffectedCountry>,
    pub casualties: Option<Casualties>,
    pub infrastructure: Option<serde_json::Value>,
    pub environmental: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
}

fn parse_repaired(json: &str) -> Result<ImpactNarrative, NarrativeError> {
    Ok(serde_json::from_str(&repair_json(json))?)
}

impl ImpactNarrative {
    /// Parse the reply text, fill in the optional sections and check the required ones.
    ///
    /// Missing casualties become zeros and a missing country list becomes
    /// a single entry for the impact country. `summary` and `location` must
    /// be present. A fenced block that does not parse is retried as the
    /// outermost brace span.
    pub fn from_reply(text: &str) -> Result<Self, NarrativeError> {
        let json = extract_json(text).ok_or(NarrativeError::Empty)?;
        let mut narrative = match parse_repaired(json) {
            Ok(narrative) => narrative,
            Err(err) => match brace_span(text).filter(|span| *span != json) {
                Some(span) => parse_repaired(span)?,
                None => return Err(err),
            },
        };

        let location = narrative
            .location
            .as_ref()
            .ok_or(NarrativeError::MissingField("location"))?;
        if narrative.summary.trim().is_empty() {
            return Err(NarrativeError::MissingField("summary"));
        }

        if narrative.affected_countries.is_empty() {
            let name = if location.country.is_empty() {
                "Unknown".to_string()
            } else {
                location.country.clone()
            };
            narrative.affected_countries.push(AffectedCountry {
                name,
                percentage_affected: Some(0.0),
                affected_area: Some(0.0),
                major_cities_affected: Vec::new(),
            });
        }
        if narrative.casualties.is_none() {
            let breakdown = ["zone_20psi", "zone_5psi", "zone_1psi", "thermal"]
                .into_iter()
                .map(|zone| (zone.to_string(), serde_json::Value::from(0)))
                .collect();
            narrative.casualties = Some(Casualties {
                estimated_deaths: Some(0.0),
                estimated_injured: Some(0.0),
                breakdown,
                methodology: "No population in the impact zone".to_string(),
            });
        }

        Ok(narrative)
    }
}

fn is_document(json: &&str) -> bool {
    !json.is_empty() && *json != "{}"
}

/// Body of the first fenced code block, without an optional `json` tag.
fn fenced_body(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = text[start + 3..].trim_start();
    let after = match after.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &after[4..],
        _ => after,
    };
    let end = after.find("```")?;
    Some(after[..end].trim())
}

/// Span from the first `{` to the last `}`.
fn brace_span(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| text[open..=close].trim())
}

/// Locate the JSON document inside a free-text reply.
///
/// Prefers the contents of a fenced code block, otherwise takes the span
/// from the first `{` to the last `}`. Empty documents count as absent.
pub fn extract_json(text: &str) -> Option<&str> {
    fenced_body(text)
        .filter(is_document)
        .or_else(|| brace_span(text).filter(is_document))
}

/// Apply the lenient repairs, outside strings: empty values become `null`
/// and trailing commas are dropped.
pub fn repair_json(json: &str) -> String {
    strip_trailing_commas(&fill_empty_values(json))
}

/// Replace a missing value after `:` (as in `"a": ,`) with `null`.
pub fn fill_empty_values(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            ':' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if next == Some(&',') {
                    out.push_str(" null");
                }
            }
            _ => {}
        }
    }
    out
}

/// Drop commas that directly precede a closing brace or bracket, outside strings.
pub fn strip_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"Here is the analysis:
```json
{
  "location": {"city": "La Paz", "region": "La Paz", "country": "Bolivia"},
  "affectedCountries": [
    {"name": "Bolivia", "percentageAffected": 1.5, "affectedArea": 450,
     "majorCitiesAffected": [
       {"name": "El Alto", "distance": 12, "population": 900000, "damageLevel": "severe"},
     ]}
  ],
  "casualties": {"estimatedDeaths": 50000, "estimatedInjured": 120000,
                 "breakdown": {"zone_20psi": 10000, "zone_5psi": 30000},
                 "methodology": "density x area"},
  "environmental": {"seismicMagnitude": 6.5},
  "summary": "A regional catastrophe, with text containing ,} inside a string",
}
```"#;

    #[test]
    fn test_parse_fenced_reply() {
        let narrative = ImpactNarrative::from_reply(REPLY).unwrap();
        assert_eq!(narrative.location.as_ref().unwrap().country, "Bolivia");
        assert_eq!(narrative.affected_countries.len(), 1);
        assert_eq!(narrative.affected_countries[0].major_cities_affected[0].name, "El Alto");
        assert_eq!(narrative.casualties.as_ref().unwrap().estimated_deaths, Some(50000.0));
        assert_eq!(narrative.affected_countries[0].affected_area, Some(450.0));
        assert!(narrative.summary.contains(",}"), "string contents must survive comma repair");
        assert!(narrative.infrastructure.is_none());
    }

    #[test]
    fn test_unfenced_reply_with_defaults() {
        let text =
            r#"Sure! {"location": {"country": "Chile"}, "summary": "Open ocean impact"} Thanks."#;
        let narrative = ImpactNarrative::from_reply(text).unwrap();
        assert_eq!(narrative.affected_countries[0].name, "Chile");
        assert_eq!(narrative.affected_countries[0].percentage_affected, Some(0.0));
        let casualties = narrative.casualties.unwrap();
        assert_eq!(casualties.estimated_deaths, Some(0.0));
        assert_eq!(casualties.breakdown.len(), 4);
        assert!(!casualties.methodology.is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let err = ImpactNarrative::from_reply(r#"{"summary": "x"}"#).unwrap_err();
        assert!(matches!(err, NarrativeError::MissingField("location")));

        let err = ImpactNarrative::from_reply(r#"{"location": {}}"#).unwrap_err();
        assert!(matches!(err, NarrativeError::MissingField("summary")));
    }

    #[test]
    fn test_empty_replies() {
        assert!(matches!(
            ImpactNarrative::from_reply("no json here"),
            Err(NarrativeError::Empty)
        ));
        assert!(matches!(
            ImpactNarrative::from_reply("```json\n{}\n```"),
            Err(NarrativeError::Empty)
        ));
    }

    #[test]
    fn test_broken_json_is_error() {
        assert!(matches!(
            ImpactNarrative::from_reply(r#"{"location": {"country": }"#),
            Err(NarrativeError::Json(_))
        ));
    }

    #[test]
    fn test_null_and_empty_numbers_accepted() {
        let text = r#"{
            "location": {"city": null, "country": "Peru"},
            "affectedCountries": [
                {"name": "Peru", "percentageAffected": null, "affectedArea": ,
                 "majorCitiesAffected": null}
            ],
            "casualties": {"estimatedDeaths": null, "estimatedInjured": , "methodology": "unknown"},
            "summary": "Remote impact"
        }"#;
        let narrative = ImpactNarrative::from_reply(text).unwrap();
        assert_eq!(narrative.location.as_ref().unwrap().city, "");

        let country = &narrative.affected_countries[0];
        assert_eq!(country.percentage_affected, None);
        assert_eq!(country.affected_area, None);
        assert!(country.major_cities_affected.is_empty());

        let casualties = narrative.casualties.unwrap();
        assert_eq!(casualties.estimated_deaths, None);
        assert_eq!(casualties.estimated_injured, None);
        assert_eq!(casualties.methodology, "unknown");
    }

    #[test]
    fn test_single_line_fence() {
        let text = r#"```json {"location":{"country":"Peru"},"summary":"x"}```"#;
        assert_eq!(
            extract_json(text),
            Some(r#"{"location":{"country":"Peru"},"summary":"x"}"#)
        );
        let narrative = ImpactNarrative::from_reply(text).unwrap();
        assert_eq!(narrative.summary, "x");

        let upper = r#"```JSON
{"location":{"country":"Peru"},"summary":"y"}```"#;
        assert_eq!(ImpactNarrative::from_reply(upper).unwrap().summary, "y");
    }

    #[test]
    fn test_unparseable_fence_retries_brace_span() {
        let text = r#"```javascript
const x = 1;
``` then {"location": {"country": "Peru"}, "summary": "after the fence"}"#;
        let narrative = ImpactNarrative::from_reply(text).unwrap();
        assert_eq!(narrative.summary, "after the fence");
    }

    #[test]
    fn test_fill_empty_values() {
        assert_eq!(fill_empty_values("{\"a\": , \"b\": 1}"), "{\"a\": null, \"b\": 1}");
        assert_eq!(fill_empty_values("{\"a\":,}"), "{\"a\": null,}");
        assert_eq!(fill_empty_values("{\"a\": \"t: ,\"}"), "{\"a\": \"t: ,\"}");
        assert_eq!(repair_json("{\"a\": ,\n}"), "{\"a\": null\n}");
    }

    #[test]
    fn test_strip_trailing_commas() {
        assert_eq!(strip_trailing_commas("[1, 2, ]"), "[1, 2 ]");
        assert_eq!(strip_trailing_commas("{\"a\": 1,\n}"), "{\"a\": 1\n}");
        assert_eq!(strip_trailing_commas("{\"a\": \"x,]\"}"), "{\"a\": \"x,]\"}");
        assert_eq!(strip_trailing_commas("{\"a\": \"q\\\",}\"}"), "{\"a\": \"q\\\",}\"}");
    }

    #[test]
    fn test_request_areas_and_flattening() {
        let result = ImpactResult {
            latitude: -15.9,
            longitude: -65.0,
            radius_20psi_km: 3.0,
            radius_5psi_km: 6.0,
            radius_1psi_km: 12.0,
            radius_thermal_km: 20.0,
            ..Default::default()
        };
        let params = SimulationParameters::default();
        let request = NarrativeRequest::new(&result, &params, Some("(2010 PK9)"));

        assert!((request.area_5psi_km2 - PI * 36.0).abs() < 1e-9);
        assert!((request.area_thermal_km2 - PI * 400.0).abs() < 1e-9);
        assert_eq!(request.entry_angle, 25.0);

        let json = request.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["impactor_name"], "(2010 PK9)");
        assert_eq!(value["radius_1psi_km"], 12.0);

        let anonymous = NarrativeRequest::new(&result, &params, None).to_json().unwrap();
        assert!(!anonymous.contains("impactor_name"));
    }
}
