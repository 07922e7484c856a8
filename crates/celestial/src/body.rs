//! Mutable physical state of one celestial object.

use nalgebra::Vector3;

use crate::body_type::BodyType;
use crate::consts::STEFAN_BOLTZMANN;
use crate::shape;
use crate::status::BodyStatus;

/// Mutable physical state of one massive body.
///
/// A `Body` carries everything intrinsic to the object: kinematics, spheroid
/// shape, spin about a single principal axis, thermal energy reservoirs,
/// tidal response parameters, and bookkeeping for breakup and destruction.
///
/// Per-tick *derived* state (gravity master, Hill master, Hill radius) is
/// deliberately not stored here; it lives in the simulation's master index
/// and is rebuilt wholesale every tick, so a `Body` can never hold a stale
/// reference to another body.
#[derive(Debug, Clone)]
pub struct Body {
    /// Unique identity among live bodies; the simulation suffixes clashes.
    pub name: String,
    /// Mass (kg)
    pub mass: f64,
    /// Position (m)
    pub position: Vector3<f64>,
    /// Velocity (m/s)
    pub velocity: Vector3<f64>,
    /// Equatorial radius of the spheroid (m)
    pub equatorial_radius: f64,
    /// Polar radius of the spheroid (m), `<= equatorial_radius`
    pub polar_radius: f64,
    /// Unit spin axis; rotation is confined to this principal axis
    pub rotation_axis: Vector3<f64>,
    /// Scalar spin rate about `rotation_axis` (rad/s)
    pub angular_velocity: f64,
    /// Accumulated rotation phase (degrees, wrapped to [0, 360))
    pub rotation_angle: f64,
    /// Categorical class; monotonically non-decreasing under mergers
    pub body_type: BodyType,
    /// Heat stored in the bulk interior (J)
    pub internal_thermal_energy: f64,
    /// Heat stored in the radiating surface skin (J)
    pub surface_thermal_energy: f64,
    /// Tidal Love number k₂
    pub tidal_love_number: f64,
    /// Tidal dissipation function Q
    pub dissipation_function: f64,
    /// Grey-body emissivity (also used as absorptivity)
    pub emissivity: f64,
    /// Display color, `#RRGGBB`; passed through to the UI layer
    pub color_code: String,
    /// Emitted-light color for luminous bodies; passthrough
    pub light_color_code: Option<String>,
    /// Texture reference; passthrough
    pub texture_path: Option<String>,
    /// False once this body has lost a merger
    pub exist: bool,
    /// Simulation time at which the body was destroyed (s); 0 while alive
    pub die_time: f64,
    /// Breakup generation counter; debris of debris is capped
    pub debris_level: u32,
    /// Simulation time of the most recent tidal breakup (s)
    pub last_break_time: f64,
    /// Cumulative time spent inside a neighbor's Roche limit (s)
    pub time_inside_roche_limit: f64,
    /// Star/comet role, re-evaluated each tick from mass and temperature
    pub status: BodyStatus,
}

impl Body {
    /// Creates a body from raw physical parameters.
    ///
    /// The rotation axis is normalized; a zero axis is replaced by +z so a
    /// degenerate input cannot poison later cross products. Thermal, tidal
    /// and display fields start at conventional defaults and can be adjusted
    /// through the public fields.
    ///
    /// # Panics
    ///
    /// Panics if `mass`, `equatorial_radius` or `polar_radius` is not
    /// strictly positive: those are caller errors, not recoverable states.
    pub fn new(
        name: impl Into<String>,
        mass: f64,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        equatorial_radius: f64,
        polar_radius: f64,
    ) -> Self {
        assert!(mass > 0.0, "body mass must be positive");
        assert!(
            equatorial_radius > 0.0 && polar_radius > 0.0,
            "body radii must be positive"
        );
        Self {
            name: name.into(),
            mass,
            position,
            velocity,
            equatorial_radius,
            polar_radius,
            rotation_axis: Vector3::z(),
            angular_velocity: 0.0,
            rotation_angle: 0.0,
            body_type: BodyType::from_mass(mass),
            internal_thermal_energy: 0.0,
            surface_thermal_energy: 0.0,
            tidal_love_number: 0.3,
            dissipation_function: 100.0,
            emissivity: 0.9,
            color_code: "#808080".to_string(),
            light_color_code: None,
            texture_path: None,
            exist: true,
            die_time: 0.0,
            debris_level: 0,
            last_break_time: 0.0,
            time_inside_roche_limit: 0.0,
            status: BodyStatus::None,
        }
    }

    /// Sets the spin state, normalizing the axis.
    ///
    /// A near-zero axis falls back to +z rather than producing NaN.
    pub fn set_spin(&mut self, axis: Vector3<f64>, angular_velocity: f64) {
        self.rotation_axis = axis.try_normalize(1.0e-12).unwrap_or_else(Vector3::z);
        self.angular_velocity = angular_velocity;
    }

    /// Mean of the equatorial and polar radii (m); the collision radius.
    pub fn average_radius(&self) -> f64 {
        0.5 * (self.equatorial_radius + self.polar_radius)
    }

    /// Spheroid volume (m³).
    pub fn volume(&self) -> f64 {
        shape::spheroid_volume(self.equatorial_radius, self.polar_radius)
    }

    /// Spheroid surface area (m²).
    pub fn surface_area(&self) -> f64 {
        shape::spheroid_surface_area(self.equatorial_radius, self.polar_radius)
    }

    /// Bulk density (kg/m³).
    pub fn density(&self) -> f64 {
        self.mass / self.volume()
    }

    /// `polar_radius / equatorial_radius`, 1.0 for a sphere.
    pub fn oblateness(&self) -> f64 {
        self.polar_radius / self.equatorial_radius
    }

    /// Moment of inertia about the spin axis, sphere approximation
    /// `0.4 m R_eq²` (kg m²).
    pub fn moment_of_inertia(&self) -> f64 {
        0.4 * self.mass * self.equatorial_radius * self.equatorial_radius
    }

    /// Translational kinetic energy (J).
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    /// Rotational kinetic energy about the spin axis (J).
    pub fn rotational_kinetic_energy(&self) -> f64 {
        0.5 * self.moment_of_inertia() * self.angular_velocity * self.angular_velocity
    }

    /// Spin angular momentum vector `I ω â` (kg m² / s).
    pub fn spin_angular_momentum(&self) -> Vector3<f64> {
        self.rotation_axis * (self.moment_of_inertia() * self.angular_velocity)
    }

    /// Linear momentum (kg m / s).
    pub fn momentum(&self) -> Vector3<f64> {
        self.velocity * self.mass
    }

    /// Gravitational self-binding energy (J, positive).
    pub fn binding_energy(&self, g: f64) -> f64 {
        shape::binding_energy(g, self.mass, self.equatorial_radius, self.polar_radius)
    }

    /// Mass of the thermal skin that exchanges heat with space (kg).
    pub fn thermal_skin_mass(&self) -> f64 {
        self.mass * self.body_type.thermal_skin_fraction()
    }

    /// Surface temperature from the thermal-skin heat reservoir (K).
    ///
    /// `T = E_surface / (c_p · m_skin)` with the heat capacity keyed by
    /// [`BodyType`]. Never negative; an empty reservoir reads 0 K.
    pub fn surface_temperature(&self) -> f64 {
        let heat_capacity = self.body_type.skin_heat_capacity() * self.thermal_skin_mass();
        if heat_capacity <= 0.0 {
            return 0.0;
        }
        (self.surface_thermal_energy / heat_capacity).max(0.0)
    }

    /// Absorbs incident radiation for `dt` seconds.
    ///
    /// `flux` is the local irradiance in W/m²; the absorbed power is the
    /// flux times the geometric cross section times the absorptivity
    /// (taken equal to the emissivity, Kirchhoff's law).
    pub fn receive_light(&mut self, flux: f64, dt: f64) {
        let cross_section = std::f64::consts::PI * self.equatorial_radius * self.polar_radius;
        self.surface_thermal_energy += flux * cross_section * self.emissivity * dt;
    }

    /// Total thermal power radiated by the surface (W), Stefan–Boltzmann.
    pub fn emit_thermal_power(&self) -> f64 {
        let t = self.surface_temperature();
        self.emissivity * STEFAN_BOLTZMANN * self.surface_area() * t.powi(4)
    }

    /// Radiates surface heat for `dt` seconds, draining the skin reservoir.
    ///
    /// The reservoir is clamped at zero: one coarse step cannot radiate more
    /// energy than the skin holds.
    pub fn radiate(&mut self, dt: f64) {
        let emitted = self.emit_thermal_power() * dt;
        self.surface_thermal_energy = (self.surface_thermal_energy - emitted).max(0.0);
    }

    /// Advances the rotation phase by `elapsed` seconds of spin.
    pub fn advance_rotation(&mut self, elapsed: f64) {
        let degrees = self.angular_velocity * elapsed * 180.0 / std::f64::consts::PI;
        self.rotation_angle = (self.rotation_angle + degrees).rem_euclid(360.0);
    }

    /// Flags this body as destroyed at simulation time `time`.
    pub fn destroy(&mut self, time: f64) {
        self.exist = false;
        self.die_time = time;
    }

    /// Distance to another body (m).
    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).norm()
    }
}
