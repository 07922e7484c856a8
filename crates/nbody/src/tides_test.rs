use approx::assert_relative_eq;
use celestial::consts::{EARTH_MASS, G};
use celestial::Body;
use nalgebra::Vector3;

use crate::tides::apply_tidal_braking;

const MOON_MASS: f64 = 7.342e22;
const MOON_DISTANCE: f64 = 3.844e8;

/// Earth at rest with the Moon on a circular prograde orbit.
fn earth_moon() -> (Body, Body, f64) {
    let earth = Body::new(
        "Earth",
        EARTH_MASS,
        Vector3::zeros(),
        Vector3::zeros(),
        6.378e6,
        6.357e6,
    );
    let mu = G * (EARTH_MASS + MOON_MASS);
    let v = (mu / MOON_DISTANCE).sqrt();
    let moon = Body::new(
        "Moon",
        MOON_MASS,
        Vector3::new(MOON_DISTANCE, 0.0, 0.0),
        Vector3::new(0.0, v, 0.0),
        1.737e6,
        1.737e6,
    );
    let mean_motion = (mu / MOON_DISTANCE.powi(3)).sqrt();
    (earth, moon, mean_motion)
}

#[test]
fn test_fast_spin_brakes_toward_mean_motion() {
    let (mut earth, mut moon, n) = earth_moon();
    moon.set_spin(Vector3::z(), 7.0e-5);

    apply_tidal_braking(&mut moon, &mut earth, G, 1.0e9);

    assert!(moon.angular_velocity < 7.0e-5);
    assert!(moon.angular_velocity > n);
}

#[test]
fn test_braking_never_overshoots_lock() {
    let (mut earth, mut moon, n) = earth_moon();
    moon.set_spin(Vector3::z(), 7.0e-5);

    // Absurdly long interval: the spin must land exactly on the orbital
    // rate, not oscillate past it.
    apply_tidal_braking(&mut moon, &mut earth, G, 1.0e15);
    assert_relative_eq!(moon.angular_velocity, n, max_relative = 1e-9);

    // A second application of a locked pair is a no-op on the spin.
    let locked = moon.angular_velocity;
    apply_tidal_braking(&mut moon, &mut earth, G, 1.0e15);
    assert_relative_eq!(moon.angular_velocity, locked, max_relative = 1e-6);
}

#[test]
fn test_braking_heats_the_interior() {
    let (mut earth, mut moon, _) = earth_moon();
    moon.set_spin(Vector3::z(), 7.0e-5);
    apply_tidal_braking(&mut moon, &mut earth, G, 1.0e9);
    assert!(moon.internal_thermal_energy > 0.0);
}

#[test]
fn test_spin_up_does_not_draw_heat() {
    let (mut earth, mut moon, _) = earth_moon();
    // Spinning slower than the orbit: tides accelerate the spin; the energy
    // comes from the orbit, not from a thermal reservoir.
    moon.set_spin(Vector3::z(), 0.0);
    apply_tidal_braking(&mut moon, &mut earth, G, 1.0e9);
    assert!(moon.angular_velocity > 0.0);
    assert_eq!(moon.internal_thermal_energy, 0.0);
}

#[test]
fn test_retrograde_orbit_drives_negative_rate() {
    let (mut earth, mut moon, n) = earth_moon();
    // Reverse the orbit but keep the spin axis: the signed mean motion is
    // negative along the axis.
    moon.velocity = -moon.velocity;
    moon.set_spin(Vector3::z(), 1.0e-6);
    apply_tidal_braking(&mut moon, &mut earth, G, 1.0e15);
    assert_relative_eq!(moon.angular_velocity, -n, max_relative = 1e-9);
}

#[test]
fn test_unbound_pair_is_skipped() {
    let (mut earth, mut moon, _) = earth_moon();
    // Triple the circular speed: strongly hyperbolic.
    moon.velocity *= 3.0;
    moon.set_spin(Vector3::z(), 7.0e-5);
    apply_tidal_braking(&mut moon, &mut earth, G, 1.0e9);
    assert_eq!(moon.angular_velocity, 7.0e-5);
    assert_eq!(moon.internal_thermal_energy, 0.0);
}

#[test]
fn test_no_dissipation_means_no_braking() {
    let (mut earth, mut moon, _) = earth_moon();
    moon.set_spin(Vector3::z(), 7.0e-5);
    moon.dissipation_function = 0.0;
    apply_tidal_braking(&mut moon, &mut earth, G, 1.0e9);
    assert_eq!(moon.angular_velocity, 7.0e-5);
}
