//! Roche-limit tracking and tidal breakup.
//!
//! A body lingering inside a more massive neighbor's Roche limit
//! accumulates exposure time; the breakup probability grows as
//! `1 − exp(−λ · time_inside)`. A triggered breakup carves a debris
//! fragment off the parent along the line to the perturber, conserving
//! momentum and closing the energy books the same way mergers do.

use celestial::{shape, Body, BodyType};
use rand::Rng;

use crate::consts::{DEBRIS_MASS_FRACTION, MAX_DEBRIS_LEVEL, ROCHE_BREAK_RATE};
use crate::vecmath::try_unit;

/// Rigid-body Roche limit: satellite held together by its own strength,
/// `d = 1.26 · R_primary · (ρ_primary / ρ_satellite)^(1/3)` (m).
pub fn roche_limit_rigid(primary: &Body, satellite: &Body) -> f64 {
    1.26 * primary.average_radius() * (primary.density() / satellite.density()).cbrt()
}

/// Fluid Roche limit: satellite deforms freely, coefficient 2.44 (m).
pub fn roche_limit_fluid(primary: &Body, satellite: &Body) -> f64 {
    2.44 * primary.average_radius() * (primary.density() / satellite.density()).cbrt()
}

/// Roche limit applicable to a satellite of the given type: solid bodies
/// resist with material strength, gaseous ones behave as fluids.
pub fn roche_limit(primary: &Body, satellite: &Body) -> f64 {
    match satellite.body_type {
        BodyType::Ice | BodyType::Terrestrial => roche_limit_rigid(primary, satellite),
        BodyType::IceGiant | BodyType::GasGiant | BodyType::Star => {
            roche_limit_fluid(primary, satellite)
        }
    }
}

/// Probability that a body breaks up after `time_inside` cumulative seconds
/// inside a Roche limit.
pub fn breakup_probability(time_inside: f64) -> f64 {
    1.0 - (-ROCHE_BREAK_RATE * time_inside.max(0.0)).exp()
}

/// Index of the heavier neighbor whose Roche limit `bodies[index]` sits
/// deepest inside, if any.
///
/// Depth is measured as separation over limit; only ratios below 1 count.
pub fn deepest_perturber(bodies: &[Body], index: usize) -> Option<usize> {
    let body = &bodies[index];
    let mut best: Option<(usize, f64)> = None;
    for (j, other) in bodies.iter().enumerate() {
        if j == index || other.mass <= body.mass {
            continue;
        }
        let limit = roche_limit(other, body);
        if limit <= 0.0 {
            continue;
        }
        let ratio = body.distance_to(other) / limit;
        if ratio < 1.0 && best.map_or(true, |(_, r)| ratio < r) {
            best = Some((j, ratio));
        }
    }
    best.map(|(j, _)| j)
}

/// Darkens a `#RRGGBB` color code; anything unparseable passes through.
fn darken_color(code: &str) -> String {
    let hex = match code.strip_prefix('#') {
        Some(h) if h.len() == 6 => h,
        _ => return code.to_string(),
    };
    match u32::from_str_radix(hex, 16) {
        Ok(rgb) => {
            let scale = |c: u32| ((c as f64) * 0.7) as u32;
            let r = scale((rgb >> 16) & 0xff);
            let g = scale((rgb >> 8) & 0xff);
            let b = scale(rgb & 0xff);
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        }
        Err(_) => code.to_string(),
    }
}

/// Carves a debris fragment off `parent` toward `perturber`.
///
/// Returns `None` when the parent has already reached the maximum breakup
/// generation. Otherwise the parent loses [`DEBRIS_MASS_FRACTION`] of its
/// mass and shrinks volume-consistently; the fragment is placed just
/// outside the parent surface on the perturber line, kicked along that
/// line, and the recoil keeps total momentum exact. The kick energy and the
/// binding-energy change are paid for out of the parent's internal
/// reservoir, split between parent and fragment by mass.
pub fn make_debris(parent: &mut Body, perturber: &Body, time: f64) -> Option<Body> {
    if parent.debris_level >= MAX_DEBRIS_LEVEL {
        return None;
    }

    let direction = try_unit(&(perturber.position - parent.position))?;

    let density = parent.density();
    let fragment_mass = parent.mass * DEBRIS_MASS_FRACTION;
    let parent_mass = parent.mass - fragment_mass;

    // Shrink the parent volume-consistently at constant density and shape.
    let oblateness = parent.oblateness();
    let parent_volume = parent_mass / density;
    parent.mass = parent_mass;
    parent.equatorial_radius = shape::equatorial_radius_for_volume(parent_volume, oblateness);
    parent.polar_radius = parent.equatorial_radius * oblateness;

    // Spherical fragment of the same density.
    let fragment_radius =
        (3.0 * fragment_mass / (4.0 * std::f64::consts::PI * density)).cbrt();

    let mut fragment = Body::new(
        format!("{} debris", parent.name),
        fragment_mass,
        parent.position
            + direction * (1.1 * (parent.average_radius() + fragment_radius)),
        parent.velocity,
        fragment_radius,
        fragment_radius,
    );

    // Kick along the perturber line at a fraction of the parent's surface
    // escape speed; recoil on the parent keeps momentum exact.
    let escape_speed =
        (2.0 * celestial::consts::G * parent.mass / parent.average_radius()).sqrt();
    let kick = 0.1 * escape_speed;
    fragment.velocity += direction * kick;
    parent.velocity -= direction * (kick * fragment_mass / parent.mass);

    fragment.body_type = BodyType::from_mass(fragment_mass);
    fragment.debris_level = parent.debris_level + 1;
    fragment.color_code = darken_color(&parent.color_code);
    fragment.tidal_love_number = parent.tidal_love_number;
    fragment.dissipation_function = parent.dissipation_function;
    fragment.emissivity = parent.emissivity;
    fragment.set_spin(parent.rotation_axis, parent.angular_velocity);

    // Thermal reservoirs split by mass; the kick energy is drawn from the
    // internal pool (clamped: a cold parent still fragments).
    let fraction = fragment_mass / (parent.mass + fragment_mass);
    fragment.internal_thermal_energy = parent.internal_thermal_energy * fraction;
    fragment.surface_thermal_energy = parent.surface_thermal_energy * fraction;
    parent.internal_thermal_energy *= 1.0 - fraction;
    parent.surface_thermal_energy *= 1.0 - fraction;

    let kick_energy = 0.5 * fragment_mass * kick * kick;
    parent.internal_thermal_energy = (parent.internal_thermal_energy - kick_energy).max(0.0);

    parent.last_break_time = time;
    parent.time_inside_roche_limit = 0.0;
    fragment.last_break_time = time;

    Some(fragment)
}

/// Draws the stochastic breakup trigger for a body that has spent
/// `time_inside` seconds inside a Roche limit.
pub fn breakup_triggered<R: Rng>(rng: &mut R, time_inside: f64) -> bool {
    rng.gen::<f64>() < breakup_probability(time_inside)
}
