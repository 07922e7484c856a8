//! Stateless conversion between relative state vectors and classical
//! orbital elements.
//!
//! The construction is the standard one through the specific angular
//! momentum vector and the eccentricity vector. Degenerate geometry (radial
//! trajectories, zero separation) is reported as an error instead of letting
//! NaN leak into the simulation.

use std::f64::consts::{PI, TAU};
use std::fmt;

use nalgebra::{Rotation3, Vector3};

use crate::consts::NON_ELLIPTICAL_ECCENTRICITY;
use crate::vecmath::DEGENERATE_NORM;

/// Orbit extraction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitError {
    /// The state vectors describe degenerate geometry: zero separation or a
    /// purely radial trajectory with no defined orbital plane.
    Degenerate,
}

impl fmt::Display for OrbitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrbitError::Degenerate => write!(f, "degenerate geometry: no defined orbital plane"),
        }
    }
}

impl std::error::Error for OrbitError {}

/// Classical orbital elements of a two-body relative state.
///
/// Angles are radians in `[0, 2π)`. For eccentricities at or above
/// [`NON_ELLIPTICAL_ECCENTRICITY`] the orbit is treated as
/// parabolic/hyperbolic: `period` is `None` and the semi-major axis is not
/// meaningful as an ellipse size (it is negative for hyperbolic energies).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Gravitational parameter `G(m1+m2)` the elements were derived with
    /// (m³/s²)
    pub mu: f64,
    /// Semi-major axis (m); negative for hyperbolic orbits
    pub semi_major_axis: f64,
    /// Eccentricity
    pub eccentricity: f64,
    /// Inclination to the reference plane (rad)
    pub inclination: f64,
    /// Right ascension of the ascending node (rad)
    pub raan: f64,
    /// Argument of periapsis (rad)
    pub argument_of_periapsis: f64,
    /// True anomaly (rad)
    pub true_anomaly: f64,
    /// Orbital period (s); `None` for non-elliptical orbits
    pub period: Option<f64>,
    /// Magnitude of the specific angular momentum (m²/s)
    pub specific_angular_momentum: f64,
}

fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

impl OrbitalElements {
    /// Extracts elements from a relative position/velocity pair and the
    /// combined gravitational parameter `mu = G(m1 + m2)`.
    ///
    /// # Errors
    ///
    /// [`OrbitError::Degenerate`] when the separation or the angular
    /// momentum is numerically zero (callers should treat the pair as
    /// unbound rather than orbiting).
    pub fn from_state_vectors(
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        mu: f64,
    ) -> Result<Self, OrbitError> {
        let r = position.norm();
        if r < DEGENERATE_NORM || mu <= 0.0 {
            return Err(OrbitError::Degenerate);
        }

        let h_vec = position.cross(velocity);
        let h = h_vec.norm();
        if h < DEGENERATE_NORM {
            return Err(OrbitError::Degenerate);
        }

        let e_vec = velocity.cross(&h_vec) / mu - position / r;
        let e = e_vec.norm();

        let energy = 0.5 * velocity.norm_squared() - mu / r;
        // Parabolic energies would put the axis at infinity; the clamp keeps
        // the division finite and the orbit is reported non-elliptical
        // through its eccentricity anyway.
        let semi_major_axis = if energy.abs() < 1.0e-300 {
            f64::INFINITY
        } else {
            -mu / (2.0 * energy)
        };

        let inclination = (h_vec.z / h).clamp(-1.0, 1.0).acos();

        // Node vector: points at the ascending node, zero for equatorial
        // orbits.
        let n_vec = Vector3::z().cross(&h_vec);
        let n = n_vec.norm();
        let equatorial = n < DEGENERATE_NORM * h;

        let raan = if equatorial {
            0.0
        } else {
            wrap_angle(n_vec.y.atan2(n_vec.x))
        };

        let circular = e < 1.0e-11;
        let argument_of_periapsis = if circular {
            0.0
        } else if equatorial {
            // Longitude of periapsis measured in the reference plane,
            // retrograde orbits measure it the other way around.
            let lon = e_vec.y.atan2(e_vec.x);
            wrap_angle(if h_vec.z >= 0.0 { lon } else { -lon })
        } else {
            let cos_aop = (n_vec.dot(&e_vec) / (n * e)).clamp(-1.0, 1.0);
            let aop = cos_aop.acos();
            wrap_angle(if e_vec.z >= 0.0 { aop } else { TAU - aop })
        };

        let true_anomaly = if circular {
            // Measure from the node (or +x for equatorial orbits).
            let reference = if equatorial { Vector3::x() } else { n_vec / n };
            let cos_nu = (reference.dot(position) / r).clamp(-1.0, 1.0);
            let nu = cos_nu.acos();
            let ascending = h_vec.cross(&reference).dot(position) >= 0.0;
            wrap_angle(if ascending { nu } else { TAU - nu })
        } else {
            let cos_nu = (e_vec.dot(position) / (e * r)).clamp(-1.0, 1.0);
            let nu = cos_nu.acos();
            wrap_angle(if position.dot(velocity) >= 0.0 {
                nu
            } else {
                TAU - nu
            })
        };

        let elliptical = e < NON_ELLIPTICAL_ECCENTRICITY && semi_major_axis.is_finite();
        let period = if elliptical && semi_major_axis > 0.0 {
            Some(TAU * (semi_major_axis.powi(3) / mu).sqrt())
        } else {
            None
        };

        Ok(Self {
            mu,
            semi_major_axis,
            eccentricity: e,
            inclination,
            raan,
            argument_of_periapsis,
            true_anomaly,
            period,
            specific_angular_momentum: h,
        })
    }

    /// Planar specialization: state confined to the xy-plane.
    ///
    /// Cheaper than the full 3-D path and the workhorse for effectively flat
    /// systems; inclination comes out as exactly `0` or `π` depending on the
    /// orbit's sense.
    pub fn from_planar_state(
        x: f64,
        y: f64,
        vx: f64,
        vy: f64,
        mu: f64,
    ) -> Result<Self, OrbitError> {
        let r = (x * x + y * y).sqrt();
        if r < DEGENERATE_NORM || mu <= 0.0 {
            return Err(OrbitError::Degenerate);
        }
        let h_z = x * vy - y * vx;
        if h_z.abs() < DEGENERATE_NORM {
            return Err(OrbitError::Degenerate);
        }

        let v2 = vx * vx + vy * vy;
        let rv = x * vx + y * vy;
        let ex = (v2 * x - rv * vx) / mu - x / r;
        let ey = (v2 * y - rv * vy) / mu - y / r;
        let e = (ex * ex + ey * ey).sqrt();

        let energy = 0.5 * v2 - mu / r;
        let semi_major_axis = if energy.abs() < 1.0e-300 {
            f64::INFINITY
        } else {
            -mu / (2.0 * energy)
        };

        let inclination = if h_z >= 0.0 { 0.0 } else { PI };
        let circular = e < 1.0e-11;
        let lon_periapsis = if circular { 0.0 } else { ey.atan2(ex) };
        let argument_of_periapsis = if circular {
            0.0
        } else {
            wrap_angle(if h_z >= 0.0 {
                lon_periapsis
            } else {
                -lon_periapsis
            })
        };

        let true_anomaly = if circular {
            let nu = y.atan2(x);
            wrap_angle(if h_z >= 0.0 { nu } else { -nu })
        } else {
            let cos_nu = ((ex * x + ey * y) / (e * r)).clamp(-1.0, 1.0);
            let nu = cos_nu.acos();
            wrap_angle(if rv >= 0.0 { nu } else { TAU - nu })
        };

        let elliptical = e < NON_ELLIPTICAL_ECCENTRICITY && semi_major_axis.is_finite();
        let period = if elliptical && semi_major_axis > 0.0 {
            Some(TAU * (semi_major_axis.powi(3) / mu).sqrt())
        } else {
            None
        };

        Ok(Self {
            mu,
            semi_major_axis,
            eccentricity: e,
            inclination,
            raan: 0.0,
            argument_of_periapsis,
            true_anomaly,
            period,
            specific_angular_momentum: h_z.abs(),
        })
    }

    /// Whether the orbit is bound and elliptical; period and apoapsis are
    /// only defined when this holds.
    pub fn is_elliptical(&self) -> bool {
        self.eccentricity < NON_ELLIPTICAL_ECCENTRICITY
            && self.semi_major_axis.is_finite()
            && self.semi_major_axis > 0.0
    }

    /// Semi-latus rectum `h²/μ` (m); defined for every conic.
    pub fn semi_latus_rectum(&self) -> f64 {
        self.specific_angular_momentum * self.specific_angular_momentum / self.mu
    }

    /// Periapsis distance (m).
    pub fn periapsis(&self) -> f64 {
        self.semi_latus_rectum() / (1.0 + self.eccentricity)
    }

    /// Apoapsis distance (m); `None` for non-elliptical orbits.
    pub fn apoapsis(&self) -> Option<f64> {
        if self.is_elliptical() {
            Some(self.semi_major_axis * (1.0 + self.eccentricity))
        } else {
            None
        }
    }

    /// Reconstructs the relative state vectors at this element set's true
    /// anomaly (perifocal construction rotated into the inertial frame).
    pub fn to_state_vectors(&self) -> (Vector3<f64>, Vector3<f64>) {
        let p = self.semi_latus_rectum();
        let e = self.eccentricity;
        let nu = self.true_anomaly;
        let r = p / (1.0 + e * nu.cos());

        let position_pf = Vector3::new(r * nu.cos(), r * nu.sin(), 0.0);
        let v_scale = (self.mu / p).sqrt();
        let velocity_pf = Vector3::new(-v_scale * nu.sin(), v_scale * (e + nu.cos()), 0.0);

        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), self.raan)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.argument_of_periapsis);

        (rotation * position_pf, rotation * velocity_pf)
    }
}
