//! Oblate-spheroid shape math.
//!
//! Every body is modelled as a spheroid with an equatorial radius `a` and a
//! polar radius `c ≤ a`. These functions are pure; the [`crate::Body`]
//! methods delegate here.

use std::f64::consts::PI;

/// Volume of an oblate spheroid, `4/3 π a² c` (m³).
pub fn spheroid_volume(equatorial_radius: f64, polar_radius: f64) -> f64 {
    4.0 / 3.0 * PI * equatorial_radius * equatorial_radius * polar_radius
}

/// Surface area of an oblate spheroid (m²).
///
/// Uses the closed form with the spheroid eccentricity for genuinely oblate
/// shapes and falls back to the sphere formula when the two radii are within
/// numerical noise of each other (the closed form divides by the
/// eccentricity).
pub fn spheroid_surface_area(equatorial_radius: f64, polar_radius: f64) -> f64 {
    let a = equatorial_radius;
    let c = polar_radius;
    let flattening = 1.0 - (c / a).powi(2);
    if flattening < 1.0e-9 {
        return 4.0 * PI * a * a;
    }
    let e = flattening.sqrt();
    2.0 * PI * a * a * (1.0 + (1.0 - e * e) / e * e.atanh())
}

/// Equatorial radius of a spheroid with volume `volume` and aspect ratio
/// `polar/equatorial = oblateness` (m).
///
/// Inverse of [`spheroid_volume`] at fixed oblateness; used by mergers to
/// conserve volume while keeping the survivor's shape.
pub fn equatorial_radius_for_volume(volume: f64, oblateness: f64) -> f64 {
    (3.0 * volume / (4.0 * PI * oblateness)).cbrt()
}

/// Gravitational self-binding energy of a spheroid (J, positive).
///
/// Uniform-density sphere value `3/5 G m² / R` evaluated at the volumetric
/// mean radius, which folds the shape into a single effective radius.
pub fn binding_energy(g: f64, mass: f64, equatorial_radius: f64, polar_radius: f64) -> f64 {
    let mean_radius = (equatorial_radius * equatorial_radius * polar_radius).cbrt();
    0.6 * g * mass * mass / mean_radius
}
