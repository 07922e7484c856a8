//! Serialized form of a body.
//!
//! [`BodyState`] is the explicit, field-for-field persisted schema of a
//! [`Body`]: plain data, camelCase keys, no derived or cached values. The
//! simulation-level document wrapping a list of these lives in the `nbody`
//! crate.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::body_type::BodyType;
use crate::status::BodyStatus;

/// Persisted state of one body.
///
/// Vectors are stored as `dimension`-element arrays; loading zero-pads
/// shorter vectors up to three components, so 2-D documents round-trip into
/// the 3-D engine with a zero third coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyState {
    pub id: String,
    pub body_type: BodyType,
    pub mass: f64,
    pub equatorial_radius: f64,
    pub polar_radius: f64,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub rotation_axis: Vec<f64>,
    pub angular_velocity: f64,
    pub color_code: String,
    pub texture_path: Option<String>,
    pub exist: bool,
    pub light_color_code: Option<String>,
    pub debris_level: u32,
    pub tidal_love_number: f64,
    pub dissipation_function: f64,
    pub emissivity: f64,
    pub surface_thermal_energy: f64,
    pub internal_thermal_energy: f64,
    pub rotation_angle: f64,
    pub last_break_time: f64,
    pub die_time: f64,
    pub time_inside_roche_limit: f64,
}

/// Zero-pads a serialized vector up to three components.
fn to_vector3(components: &[f64]) -> Vector3<f64> {
    let mut v = Vector3::zeros();
    for (i, &c) in components.iter().take(3).enumerate() {
        v[i] = c;
    }
    v
}

/// Truncates a vector to the document's dimension for serialization.
fn to_components(v: &Vector3<f64>, dimension: usize) -> Vec<f64> {
    v.iter().take(dimension.clamp(1, 3)).copied().collect()
}

impl BodyState {
    /// Captures the persisted fields of a live body.
    ///
    /// Derived per-tick state (masters, Hill radii, status) is not part of
    /// the schema and is rebuilt after loading.
    pub fn capture(body: &Body, dimension: usize) -> Self {
        Self {
            id: body.name.clone(),
            body_type: body.body_type,
            mass: body.mass,
            equatorial_radius: body.equatorial_radius,
            polar_radius: body.polar_radius,
            position: to_components(&body.position, dimension),
            velocity: to_components(&body.velocity, dimension),
            rotation_axis: to_components(&body.rotation_axis, dimension),
            angular_velocity: body.angular_velocity,
            color_code: body.color_code.clone(),
            texture_path: body.texture_path.clone(),
            exist: body.exist,
            light_color_code: body.light_color_code.clone(),
            debris_level: body.debris_level,
            tidal_love_number: body.tidal_love_number,
            dissipation_function: body.dissipation_function,
            emissivity: body.emissivity,
            surface_thermal_energy: body.surface_thermal_energy,
            internal_thermal_energy: body.internal_thermal_energy,
            rotation_angle: body.rotation_angle,
            last_break_time: body.last_break_time,
            die_time: body.die_time,
            time_inside_roche_limit: body.time_inside_roche_limit,
        }
    }

    /// Reconstructs a body from its persisted state.
    pub fn restore(&self) -> Body {
        let mut body = Body::new(
            self.id.clone(),
            self.mass,
            to_vector3(&self.position),
            to_vector3(&self.velocity),
            self.equatorial_radius,
            self.polar_radius,
        );
        body.set_spin(to_vector3(&self.rotation_axis), self.angular_velocity);
        body.body_type = self.body_type;
        body.color_code = self.color_code.clone();
        body.texture_path = self.texture_path.clone();
        body.exist = self.exist;
        body.light_color_code = self.light_color_code.clone();
        body.debris_level = self.debris_level;
        body.tidal_love_number = self.tidal_love_number;
        body.dissipation_function = self.dissipation_function;
        body.emissivity = self.emissivity;
        body.surface_thermal_energy = self.surface_thermal_energy;
        body.internal_thermal_energy = self.internal_thermal_energy;
        body.rotation_angle = self.rotation_angle;
        body.last_break_time = self.last_break_time;
        body.die_time = self.die_time;
        body.time_inside_roche_limit = self.time_inside_roche_limit;
        body.status = BodyStatus::None;
        body
    }
}
