//! Collision detection and momentum-conserving mergers.
//!
//! When two bodies touch, the heavier absorbs the lighter. The merged body
//! conserves mass, momentum, angular momentum (spin plus orbital about the
//! pair barycenter) and volume; whatever mechanical energy the simplified
//! post-merge state cannot account for is dumped into the survivor's
//! internal thermal reservoir, so total energy bookkeeping stays closed.

use celestial::{shape, Body};

use crate::vecmath::unit_or;

/// Two bodies collide when their separation is below the sum of their
/// average radii.
pub fn are_colliding(a: &Body, b: &Body) -> bool {
    a.distance_to(b) < a.average_radius() + b.average_radius()
}

/// Merges `victim` into `receiver` in place.
///
/// * Velocity: momentum-conserving.
/// * Position: pair barycenter.
/// * Spin: total angular momentum (both spins plus both orbital terms about
///   the barycenter) mapped onto a single new axis and rate.
/// * Shape: volume-conserving at the receiver's oblateness.
/// * Type: receiver's type upgraded by the merge rule.
/// * Energy: the difference between pre- and post-merge mechanical energy
///   (kinetic, rotational, pair potential, self-binding) is added to the
///   receiver's internal thermal energy; surface reservoirs simply add.
///
/// # Panics
///
/// Panics when called with the lighter body as the receiver: the merge
/// direction is the caller's responsibility and reversing it is a bug, not
/// a recoverable state.
pub fn merge(receiver: &mut Body, victim: &Body, g: f64) {
    assert!(
        receiver.mass >= victim.mass,
        "merge receiver must be the heavier body"
    );

    let separation = receiver.distance_to(victim).max(1.0);
    let total_mass = receiver.mass + victim.mass;

    // Pre-merge mechanical energy.
    let energy_before = receiver.kinetic_energy()
        + victim.kinetic_energy()
        + receiver.rotational_kinetic_energy()
        + victim.rotational_kinetic_energy()
        - g * receiver.mass * victim.mass / separation
        - receiver.binding_energy(g)
        - victim.binding_energy(g);

    // Barycentric kinematics.
    let position =
        (receiver.position * receiver.mass + victim.position * victim.mass) / total_mass;
    let velocity = (receiver.momentum() + victim.momentum()) / total_mass;

    // Total angular momentum about the barycenter: both spins plus both
    // orbital contributions.
    let angular_momentum = receiver.spin_angular_momentum()
        + victim.spin_angular_momentum()
        + (receiver.position - position).cross(&(receiver.velocity - velocity)) * receiver.mass
        + (victim.position - position).cross(&(victim.velocity - velocity)) * victim.mass;

    // Volume-conserving shape at the receiver's oblateness.
    let volume = receiver.volume() + victim.volume();
    let oblateness = receiver.oblateness();
    let equatorial_radius = shape::equatorial_radius_for_volume(volume, oblateness);
    let polar_radius = equatorial_radius * oblateness;

    let body_type = receiver.body_type.merged_with(victim.body_type);

    receiver.mass = total_mass;
    receiver.position = position;
    receiver.velocity = velocity;
    receiver.equatorial_radius = equatorial_radius;
    receiver.polar_radius = polar_radius;
    receiver.body_type = body_type;

    let moment = receiver.moment_of_inertia();
    let l = angular_momentum.norm();
    receiver.rotation_axis = unit_or(&angular_momentum, receiver.rotation_axis);
    receiver.angular_velocity = if moment > 0.0 { l / moment } else { 0.0 };

    // Post-merge mechanical energy; the difference heats the interior.
    let energy_after = receiver.kinetic_energy() + receiver.rotational_kinetic_energy()
        - receiver.binding_energy(g);
    receiver.internal_thermal_energy +=
        victim.internal_thermal_energy + (energy_before - energy_after);
    receiver.surface_thermal_energy += victim.surface_thermal_energy;

    // Luminous material survives the merge.
    if receiver.light_color_code.is_none() {
        receiver.light_color_code = victim.light_color_code.clone();
    }
}
