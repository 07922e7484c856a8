use approx::assert_relative_eq;
use celestial::consts::{AU, EARTH_MASS, G, SOLAR_MASS};
use celestial::Body;
use nalgebra::Vector3;

use crate::hierarchy::{hill_radius, Hierarchy, Masters};

const MOON_MASS: f64 = 7.342e22;
const MOON_DISTANCE: f64 = 3.844e8;

/// Sun at rest, Earth on a circular orbit, Moon on a circular orbit of the
/// Earth.
fn sun_earth_moon() -> Vec<Body> {
    let sun = Body::new(
        "Sun",
        SOLAR_MASS,
        Vector3::zeros(),
        Vector3::zeros(),
        6.96e8,
        6.96e8,
    );
    let v_earth = (G * (SOLAR_MASS + EARTH_MASS) / AU).sqrt();
    let earth = Body::new(
        "Earth",
        EARTH_MASS,
        Vector3::new(AU, 0.0, 0.0),
        Vector3::new(0.0, v_earth, 0.0),
        6.378e6,
        6.357e6,
    );
    let v_moon = (G * (EARTH_MASS + MOON_MASS) / MOON_DISTANCE).sqrt();
    let moon = Body::new(
        "Moon",
        MOON_MASS,
        Vector3::new(AU + MOON_DISTANCE, 0.0, 0.0),
        Vector3::new(0.0, v_earth + v_moon, 0.0),
        1.737e6,
        1.737e6,
    );
    vec![sun, earth, moon]
}

fn masters_of(bodies: &[Body]) -> Masters {
    let mut masters = Masters::new();
    masters.update(bodies, G, 2.0);
    masters
}

#[test]
fn test_hill_radius_of_earth() {
    let r = hill_radius(
        G,
        EARTH_MASS,
        SOLAR_MASS,
        &Vector3::new(AU, 0.0, 0.0),
        &Vector3::new(0.0, (G * (SOLAR_MASS + EARTH_MASS) / AU).sqrt(), 0.0),
    );
    // Earth's Hill radius is about 0.01 AU.
    let expected = AU * (EARTH_MASS / (3.0 * SOLAR_MASS)).cbrt();
    assert_relative_eq!(r, expected, max_relative = 1e-3);
    assert!(r > 1.0e9 && r < 2.0e9);
}

#[test]
fn test_moon_hill_master_is_earth_not_sun() {
    let bodies = sun_earth_moon();
    let masters = masters_of(&bodies);

    // The Sun pulls the Moon about twice as hard as the Earth does, so the
    // gravity master is the Sun; the Hill refinement must still hand the
    // Moon to the Earth.
    assert_eq!(masters.gravity_master("Moon"), Some("Sun"));
    assert_eq!(masters.hill_master("Moon"), Some("Earth"));
    assert_eq!(masters.hill_master("Earth"), Some("Sun"));
    assert_eq!(masters.hill_master("Sun"), None);
}

#[test]
fn test_root_hill_radius_is_infinite() {
    let bodies = sun_earth_moon();
    let masters = masters_of(&bodies);
    assert!(masters.hill_radius("Sun").unwrap().is_infinite());
    assert!(masters.hill_radius("Earth").unwrap().is_finite());
    assert!(masters.hill_radius("Moon").unwrap().is_finite());
}

#[test]
fn test_implausibly_heavy_master_is_rejected() {
    let sun = Body::new(
        "Sun",
        SOLAR_MASS,
        Vector3::zeros(),
        Vector3::zeros(),
        6.96e8,
        6.96e8,
    );
    // A 1 kg speck: the Sun is ~2e30 times heavier, far beyond plausibility.
    let speck = Body::new(
        "speck",
        1.0,
        Vector3::new(AU, 0.0, 0.0),
        Vector3::new(0.0, 3.0e4, 0.0),
        1.0,
        1.0,
    );
    let masters = masters_of(&[sun, speck]);
    assert_eq!(masters.gravity_master("speck"), None);
    assert_eq!(masters.hill_master("speck"), None);
    assert!(masters.hill_radius("speck").unwrap().is_infinite());
}

#[test]
fn test_tree_levels_and_parents() {
    let bodies = sun_earth_moon();
    let masters = masters_of(&bodies);
    let tree = Hierarchy::build(&bodies, &masters);

    assert_eq!(tree.len(), 3);
    let roots: Vec<_> = tree.roots().collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name, "Sun");
    assert_eq!(roots[0].level, 0);

    assert_eq!(tree.node_of("Earth").unwrap().level, 1);
    assert_eq!(tree.node_of("Moon").unwrap().level, 2);
    assert_eq!(tree.parent_of("Moon").unwrap().name, "Earth");
    assert_eq!(tree.parent_of("Earth").unwrap().name, "Sun");
    assert!(tree.parent_of("Sun").is_none());

    let sun_children = tree.children_of("Sun");
    assert_eq!(sun_children.len(), 1);
    assert_eq!(sun_children[0].name, "Earth");
}

#[test]
fn test_tree_aggregates_barycenters() {
    let bodies = sun_earth_moon();
    let masters = masters_of(&bodies);
    let tree = Hierarchy::build(&bodies, &masters);

    let total_mass: f64 = bodies.iter().map(|b| b.mass).sum();
    let weighted: Vector3<f64> = bodies
        .iter()
        .fold(Vector3::zeros(), |acc, b| acc + b.position * b.mass);

    let root = tree.node_of("Sun").unwrap();
    assert_relative_eq!(root.mass, total_mass, max_relative = 1e-12);
    assert_relative_eq!(root.position.x, weighted.x / total_mass, max_relative = 1e-9);

    // The Earth node aggregates Earth + Moon only.
    let earth_node = tree.node_of("Earth").unwrap();
    assert_relative_eq!(earth_node.mass, EARTH_MASS + MOON_MASS, max_relative = 1e-12);
    assert!(earth_node.position.x > AU);
}

#[test]
fn test_destroyed_bodies_are_excluded_from_tree() {
    let mut bodies = sun_earth_moon();
    let masters = masters_of(&bodies);
    bodies[2].destroy(100.0);
    let tree = Hierarchy::build(&bodies, &masters);
    assert_eq!(tree.len(), 2);
    assert!(tree.node_of("Moon").is_none());
}
