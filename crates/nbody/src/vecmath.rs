//! Guarded vector helpers over nalgebra.
//!
//! nalgebra covers the arithmetic; these wrappers exist so degenerate
//! geometry (zero-length axes, parallel cross products) surfaces as `None`
//! or a stated fallback instead of silently propagating NaN through the
//! integrator.

use nalgebra::{Rotation3, Unit, Vector3};

/// Length below which a vector is treated as zero.
pub const DEGENERATE_NORM: f64 = 1.0e-12;

/// Unit vector along `v`, or `None` when `v` is degenerate.
pub fn try_unit(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    v.try_normalize(DEGENERATE_NORM)
}

/// Unit vector along `v`, or `fallback` when `v` is degenerate.
pub fn unit_or(v: &Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(DEGENERATE_NORM).unwrap_or(fallback)
}

/// Cross product, or `None` when the inputs are (anti)parallel or zero and
/// the product is degenerate.
pub fn try_cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<Vector3<f64>> {
    let c = a.cross(b);
    if c.norm() < DEGENERATE_NORM {
        None
    } else {
        Some(c)
    }
}

/// Rotates `v` by `angle` radians about `axis` (axis-angle rotation).
///
/// A degenerate axis leaves `v` unchanged: rotation about nothing is the
/// identity, not NaN.
pub fn rotate_about_axis(v: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    match Unit::try_new(*axis, DEGENERATE_NORM) {
        Some(unit_axis) => Rotation3::from_axis_angle(&unit_axis, angle) * v,
        None => *v,
    }
}

/// Any unit vector perpendicular to `v`.
///
/// Picks the coordinate axis least aligned with `v` as the seed, so the
/// result is well conditioned for every input direction.
pub fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let seed = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vector3::x()
    } else if v.y.abs() <= v.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    unit_or(&v.cross(&seed), Vector3::x())
}
