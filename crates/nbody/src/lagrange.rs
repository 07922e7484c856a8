//! Effective potential of the circular restricted three-body problem and a
//! Newton-iteration solver for its stationary points (L1–L5).
//!
//! Works in the rotating frame of two primaries on a circular mutual orbit,
//! in their orbital plane. Visualization support only; nothing in the
//! integrator depends on this module.

use nalgebra::{Matrix2, Vector2};

/// Two primaries on a circular orbit, in their rotating barycentric frame.
///
/// The primaries sit on the x-axis: the heavier at `-m2/(m1+m2) · d`, the
/// lighter at `m1/(m1+m2) · d`, with the frame rotating at the circular
/// rate `ω² = G (m1 + m2) / d³`.
#[derive(Debug, Clone, Copy)]
pub struct RotatingFrame {
    pub g: f64,
    /// Heavier primary mass (kg)
    pub m1: f64,
    /// Lighter primary mass (kg)
    pub m2: f64,
    /// Separation of the primaries (m)
    pub separation: f64,
}

impl RotatingFrame {
    /// # Panics
    ///
    /// Panics unless `m1 >= m2 > 0` and the separation is positive.
    pub fn new(g: f64, m1: f64, m2: f64, separation: f64) -> Self {
        assert!(m1 >= m2 && m2 > 0.0, "primaries must satisfy m1 >= m2 > 0");
        assert!(separation > 0.0, "separation must be positive");
        Self {
            g,
            m1,
            m2,
            separation,
        }
    }

    /// Position of the heavier primary on the x-axis (m).
    pub fn primary_position(&self) -> f64 {
        -self.m2 / (self.m1 + self.m2) * self.separation
    }

    /// Position of the lighter primary on the x-axis (m).
    pub fn secondary_position(&self) -> f64 {
        self.m1 / (self.m1 + self.m2) * self.separation
    }

    /// Square of the frame rotation rate (s⁻²).
    pub fn omega_squared(&self) -> f64 {
        self.g * (self.m1 + self.m2) / self.separation.powi(3)
    }

    /// Effective potential per unit test mass (J/kg):
    /// `U = −G m1/r1 − G m2/r2 − ½ ω² (x² + y²)`.
    pub fn effective_potential(&self, point: &Vector2<f64>) -> f64 {
        let r1 = (point - Vector2::new(self.primary_position(), 0.0)).norm();
        let r2 = (point - Vector2::new(self.secondary_position(), 0.0)).norm();
        -self.g * self.m1 / r1 - self.g * self.m2 / r2
            - 0.5 * self.omega_squared() * point.norm_squared()
    }

    /// Gradient of the effective potential (J/kg/m).
    pub fn gradient(&self, point: &Vector2<f64>) -> Vector2<f64> {
        let d1 = point - Vector2::new(self.primary_position(), 0.0);
        let d2 = point - Vector2::new(self.secondary_position(), 0.0);
        let r1 = d1.norm();
        let r2 = d2.norm();
        d1 * (self.g * self.m1 / r1.powi(3)) + d2 * (self.g * self.m2 / r2.powi(3))
            - point * self.omega_squared()
    }

    /// Hessian of the effective potential.
    pub fn hessian(&self, point: &Vector2<f64>) -> Matrix2<f64> {
        let omega2 = self.omega_squared();
        let mut h = Matrix2::new(-omega2, 0.0, 0.0, -omega2);
        for (mass, x0) in [
            (self.m1, self.primary_position()),
            (self.m2, self.secondary_position()),
        ] {
            let d = point - Vector2::new(x0, 0.0);
            let r = d.norm();
            let r3 = r.powi(3);
            let r5 = r.powi(5);
            // ∂²(−Gm/r) = Gm (I/r³ − 3 d dᵀ / r⁵)
            h[(0, 0)] += self.g * mass * (1.0 / r3 - 3.0 * d.x * d.x / r5);
            h[(1, 1)] += self.g * mass * (1.0 / r3 - 3.0 * d.y * d.y / r5);
            let off = self.g * mass * (-3.0 * d.x * d.y / r5);
            h[(0, 1)] += off;
            h[(1, 0)] += off;
        }
        h
    }

    /// Newton iteration on the gradient from `seed`, damped so no step
    /// exceeds a tenth of the primary separation.
    fn newton(&self, seed: Vector2<f64>) -> Vector2<f64> {
        let max_step = 0.1 * self.separation;
        let mut point = seed;
        for _ in 0..100 {
            let grad = self.gradient(&point);
            let step = match self.hessian(&point).try_inverse() {
                Some(inverse) => -(inverse * grad),
                // Singular Hessian: fall back to a scaled gradient step.
                None => -grad * (self.separation / grad.norm().max(1.0e-30)) * 1.0e-3,
            };
            let clamped = if step.norm() > max_step {
                step * (max_step / step.norm())
            } else {
                step
            };
            point += clamped;
            if clamped.norm() < 1.0e-9 * self.separation {
                break;
            }
        }
        point
    }

    /// The five Lagrange points, in order L1..L5 (m, rotating frame).
    ///
    /// Seeds: the collinear points from the Hill-radius scale around the
    /// secondary, the triangular points from the exact equilateral
    /// geometry; Newton polishes each.
    pub fn lagrange_points(&self) -> [Vector2<f64>; 5] {
        let d = self.separation;
        let x2 = self.secondary_position();
        let hill = d * (self.m2 / (3.0 * self.m1)).cbrt();

        let l1 = self.newton(Vector2::new(x2 - hill, 0.0));
        let l2 = self.newton(Vector2::new(x2 + hill, 0.0));
        let l3 = self.newton(Vector2::new(self.primary_position() - d, 0.0));

        let x_mid = self.primary_position() + 0.5 * d;
        let y_tri = d * 3.0_f64.sqrt() / 2.0;
        let l4 = self.newton(Vector2::new(x_mid, y_tri));
        let l5 = self.newton(Vector2::new(x_mid, -y_tri));

        [l1, l2, l3, l4, l5]
    }
}
