use approx::assert_relative_eq;
use celestial::consts::{AU, EARTH_MASS, G, SOLAR_MASS};
use nalgebra::Vector2;

use crate::lagrange::RotatingFrame;

fn sun_earth() -> RotatingFrame {
    RotatingFrame::new(G, SOLAR_MASS, EARTH_MASS, AU)
}

#[test]
fn test_primaries_straddle_the_barycenter() {
    let frame = sun_earth();
    assert!(frame.primary_position() < 0.0);
    assert!(frame.secondary_position() > 0.0);
    // Barycenter balance: m1 x1 + m2 x2 = 0.
    assert_relative_eq!(
        SOLAR_MASS * frame.primary_position() + EARTH_MASS * frame.secondary_position(),
        0.0,
        epsilon = 1.0e22
    );
    assert_relative_eq!(
        frame.secondary_position() - frame.primary_position(),
        AU,
        max_relative = 1e-12
    );
}

#[test]
fn test_omega_matches_keplers_third_law() {
    let frame = sun_earth();
    let period = std::f64::consts::TAU / frame.omega_squared().sqrt();
    assert_relative_eq!(period, 365.25 * 86400.0, max_relative = 5e-3);
}

#[test]
fn test_all_five_points_are_stationary() {
    let frame = sun_earth();
    // Characteristic acceleration in the frame.
    let scale = frame.omega_squared() * AU;
    for point in frame.lagrange_points() {
        assert!(frame.gradient(&point).norm() < 1.0e-7 * scale);
    }
}

#[test]
fn test_collinear_points_near_hill_scale() {
    let frame = sun_earth();
    let [l1, l2, l3, _, _] = frame.lagrange_points();
    let x2 = frame.secondary_position();
    let hill = AU * (EARTH_MASS / (3.0 * SOLAR_MASS)).cbrt();

    // L1 sunward of the Earth, L2 beyond it, both about one Hill radius out.
    assert!(l1.x < x2 && l2.x > x2);
    assert_relative_eq!(x2 - l1.x, hill, max_relative = 0.1);
    assert_relative_eq!(l2.x - x2, hill, max_relative = 0.1);
    assert!(l1.y.abs() < 1.0 && l2.y.abs() < 1.0);

    // L3 on the far side of the Sun, about one separation out.
    assert!(l3.x < frame.primary_position());
    assert_relative_eq!(l3.x.abs(), AU, max_relative = 0.05);
}

#[test]
fn test_triangular_points_are_equilateral() {
    let frame = sun_earth();
    let [_, _, _, l4, l5] = frame.lagrange_points();
    let primary = Vector2::new(frame.primary_position(), 0.0);
    let secondary = Vector2::new(frame.secondary_position(), 0.0);

    assert!(l4.y > 0.0 && l5.y < 0.0);
    for point in [l4, l5] {
        assert_relative_eq!((point - primary).norm(), AU, max_relative = 1e-4);
        assert_relative_eq!((point - secondary).norm(), AU, max_relative = 1e-4);
    }
    // Mirror symmetry about the primary axis.
    assert_relative_eq!(l4.x, l5.x, max_relative = 1e-6);
    assert_relative_eq!(l4.y, -l5.y, max_relative = 1e-6);
}

#[test]
fn test_potential_peaks_between_primaries() {
    let frame = sun_earth();
    let [l1, ..] = frame.lagrange_points();
    // L1 is a saddle: moving along the axis toward either primary lowers
    // the effective potential.
    let u = frame.effective_potential(&l1);
    let toward_sun = frame.effective_potential(&(l1 - Vector2::new(1.0e8, 0.0)));
    let toward_earth = frame.effective_potential(&(l1 + Vector2::new(1.0e8, 0.0)));
    assert!(toward_sun < u);
    assert!(toward_earth < u);
}

#[test]
#[should_panic(expected = "m1 >= m2")]
fn test_rejects_swapped_primaries() {
    RotatingFrame::new(G, EARTH_MASS, SOLAR_MASS, AU);
}
