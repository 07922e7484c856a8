//! Tidal spin-orbit coupling.
//!
//! Each body orbiting inside a Hill sphere has its spin rate nudged toward
//! the orbital mean motion (tidal locking) at the classical
//! Love-number/dissipation rate. The nudge never overshoots the target
//! rate, and rotational kinetic energy lost to the braking torque is
//! deposited 1:1 into the body's internal thermal reservoir.

use celestial::Body;

use crate::orbit::OrbitalElements;

/// Signed orbital mean motion as seen along a body's spin axis (rad/s).
///
/// The sign captures whether the orbit runs with or against the spin; a
/// retrograde orbit drives the spin toward the negative rate.
fn signed_mean_motion(body: &Body, companion: &Body, mu: f64, semi_major_axis: f64) -> f64 {
    let n = (mu / semi_major_axis.powi(3)).sqrt();
    let h = (body.position - companion.position).cross(&(body.velocity - companion.velocity));
    if h.dot(&body.rotation_axis) >= 0.0 {
        n
    } else {
        -n
    }
}

/// Drives one body's spin toward the orbital rate, returning the heat
/// deposited (J).
fn brake_one(body: &mut Body, companion_mass: f64, a: f64, n_signed: f64, dt: f64) -> f64 {
    if body.dissipation_function <= 0.0 {
        return 0.0;
    }
    // Classical despinning scale: the spin relaxes toward the orbital rate
    // as dΩ/dt = −λ (Ω − n) with λ = (3 k₂ / Q) (M'/m) (R/a)³ |n|.
    let rate = 3.0 * body.tidal_love_number / body.dissipation_function
        * (companion_mass / body.mass)
        * (body.equatorial_radius / a).powi(3)
        * n_signed.abs();

    let gap = n_signed - body.angular_velocity;
    // Clamp: one application never moves past the orbital rate.
    let delta = if rate * dt >= 1.0 { gap } else { rate * dt * gap };

    let energy_before = body.rotational_kinetic_energy();
    body.angular_velocity += delta;
    let energy_after = body.rotational_kinetic_energy();

    let lost = energy_before - energy_after;
    if lost > 0.0 {
        body.internal_thermal_energy += lost;
        lost
    } else {
        // Spin-up draws on the orbit, not on stored heat.
        0.0
    }
}

/// Applies tidal braking to a body/master pair over `dt` seconds.
///
/// Both partners are nudged toward the mutual orbital mean motion. Pairs on
/// degenerate or non-elliptical relative orbits are skipped: there is no
/// well-defined rate to lock to.
pub fn apply_tidal_braking(body: &mut Body, master: &mut Body, g: f64, dt: f64) {
    let mu = g * (body.mass + master.mass);
    let relative_position = body.position - master.position;
    let relative_velocity = body.velocity - master.velocity;

    let elements =
        match OrbitalElements::from_state_vectors(&relative_position, &relative_velocity, mu) {
            Ok(e) if e.is_elliptical() => e,
            _ => return,
        };
    let a = elements.semi_major_axis;

    let n_body = signed_mean_motion(body, master, mu, a);
    brake_one(body, master.mass, a, n_body, dt);

    let n_master = signed_mean_motion(master, body, mu, a);
    brake_one(master, body.mass, a, n_master, dt);
}
