//! Physical constants in SI units.

/// Gravitational constant (m³ kg⁻¹ s⁻²)
pub const G: f64 = 6.674e-11;

/// Stefan–Boltzmann constant (W m⁻² K⁻⁴)
pub const STEFAN_BOLTZMANN: f64 = 5.670374419e-8;

/// Solar mass (kg)
pub const SOLAR_MASS: f64 = 1.989e30;

/// Solar luminosity (W)
pub const SOLAR_LUMINOSITY: f64 = 3.828e26;

/// Earth mass (kg)
pub const EARTH_MASS: f64 = 5.972e24;

/// Astronomical unit (m)
pub const AU: f64 = 1.496e11;

/// Minimum mass for sustained hydrogen burning, ~0.08 M☉ (kg)
///
/// Bodies at or above this mass are classified as stars and carry a
/// [`crate::status::BodyStatus::Star`] status.
pub const HYDROGEN_BURNING_MASS: f64 = 0.08 * SOLAR_MASS;
