//! Persisted simulation document.
//!
//! [`SimulationState`] is the explicit top-level JSON schema: global
//! constants plus the per-body [`BodyState`] records. Malformed or
//! incomplete documents abort the load; there is no partial recovery.

use std::fmt;

use celestial::BodyState;
use serde::{Deserialize, Serialize};

/// Top-level persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    /// Spatial dimension the vectors were saved with (2 or 3)
    pub dimension: u32,
    /// Gravitational constant
    #[serde(rename = "G")]
    pub g: f64,
    /// Force-law distance exponent
    pub gravity_dt_power: f64,
    /// Base integration timestep (s)
    pub time_step: f64,
    /// Accumulated simulated time (s)
    pub time_step_accumulator: f64,
    /// Force-cutoff scale factor
    pub epsilon: f64,
    /// All bodies, live and destroyed (`exist` distinguishes them)
    pub objects: Vec<BodyState>,
}

/// Fatal (de)serialization failure.
#[derive(Debug)]
pub enum PersistError {
    Json(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Json(e) => write!(f, "simulation state JSON error: {}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Json(e)
    }
}

/// Serializes a document to JSON text.
pub fn to_json(state: &SimulationState) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parses a document from JSON text; any missing or malformed field is
/// fatal.
pub fn from_json(text: &str) -> Result<SimulationState, PersistError> {
    Ok(serde_json::from_str(text)?)
}
