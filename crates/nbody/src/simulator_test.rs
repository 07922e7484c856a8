use approx::assert_relative_eq;
use celestial::consts::{AU, EARTH_MASS, G, SOLAR_LUMINOSITY, SOLAR_MASS};
use celestial::Body;
use nalgebra::Vector3;

use crate::persist;
use crate::simulator::{Simulation, StepResult};

const MOON_MASS: f64 = 7.342e22;
const MOON_DISTANCE: f64 = 3.844e8;

fn sun() -> Body {
    Body::new(
        "Sun",
        SOLAR_MASS,
        Vector3::zeros(),
        Vector3::zeros(),
        6.96e8,
        6.96e8,
    )
}

fn earth() -> Body {
    let v = (G * (SOLAR_MASS + EARTH_MASS) / AU).sqrt();
    Body::new(
        "Earth",
        EARTH_MASS,
        Vector3::new(AU, 0.0, 0.0),
        Vector3::new(0.0, v, 0.0),
        6.378e6,
        6.357e6,
    )
}

fn moon() -> Body {
    let v_earth = (G * (SOLAR_MASS + EARTH_MASS) / AU).sqrt();
    let v_moon = (G * (EARTH_MASS + MOON_MASS) / MOON_DISTANCE).sqrt();
    Body::new(
        "Moon",
        MOON_MASS,
        Vector3::new(AU + MOON_DISTANCE, 0.0, 0.0),
        Vector3::new(0.0, v_earth + v_moon, 0.0),
        1.737e6,
        1.737e6,
    )
}

fn sun_earth() -> Simulation {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut sim = Simulation::with_seed(1);
    sim.add_body(sun());
    sim.add_body(earth());
    sim
}

fn separation(sim: &Simulation, a: &str, b: &str) -> f64 {
    (sim.body(a).unwrap().position - sim.body(b).unwrap().position).norm()
}

#[test]
fn test_add_body_dedups_names() {
    let mut sim = Simulation::new();
    assert_eq!(sim.add_body(earth()), "Earth");
    assert_eq!(sim.add_body(earth()), "Earth (2)");
    assert_eq!(sim.add_body(earth()), "Earth (3)");
    assert_eq!(sim.body_count(), 3);
}

#[test]
fn test_bodies_sorted_by_mass() {
    let mut sim = Simulation::new();
    sim.add_body(earth());
    sim.add_body(sun());
    sim.add_body(moon());
    let names: Vec<_> = sim.bodies().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Sun", "Earth", "Moon"]);
}

#[test]
fn test_circular_orbit_stays_circular() {
    let mut sim = sun_earth();
    let result = sim.simulate(5000, true);
    assert_eq!(result, StepResult::Normal);
    assert_relative_eq!(separation(&sim, "Earth", "Sun"), AU, max_relative = 1e-3);
    assert_relative_eq!(sim.time(), 5000.0 * 60.0, max_relative = 1e-12);
}

#[test]
fn test_leapfrog_conserves_energy() {
    let mut sim = sun_earth();
    let before = sim.total_kinetic_energy() + sim.total_potential_energy();
    sim.simulate(5000, true);
    let after = sim.total_kinetic_energy() + sim.total_potential_energy();
    assert!(before < 0.0, "bound system must have negative total energy");
    assert_relative_eq!(after, before, max_relative = 1e-6);
}

#[test]
fn test_orbital_elements_recover_kepler_period() {
    let sim = sun_earth();
    let elements = sim.orbital_elements_of("Earth", "Sun").unwrap().unwrap();
    assert!(elements.is_elliptical());
    assert_relative_eq!(
        elements.period.unwrap(),
        365.25 * 86400.0,
        max_relative = 5e-3
    );
    assert!(sim.orbital_elements_of("Earth", "Vulcan").is_none());
}

#[test]
fn test_merger_changes_count_and_conserves_momentum() {
    let mut sim = Simulation::with_seed(1);
    sim.add_body(Body::new(
        "heavy",
        2.0e24,
        Vector3::zeros(),
        Vector3::new(10.0, 0.0, 0.0),
        1.0e6,
        1.0e6,
    ));
    sim.add_body(Body::new(
        "light",
        1.0e24,
        Vector3::new(1.0e6, 0.0, 0.0),
        Vector3::zeros(),
        1.0e6,
        1.0e6,
    ));
    let momentum_before = 2.0e24 * 10.0;

    let result = sim.simulate(1, false);
    assert_eq!(result, StepResult::NumChanged);
    assert_eq!(sim.body_count(), 1);

    let survivor = &sim.bodies()[0];
    assert_eq!(survivor.name, "heavy");
    assert_relative_eq!(survivor.mass, 3.0e24, max_relative = 1e-12);
    assert_relative_eq!(
        survivor.momentum().x,
        momentum_before,
        max_relative = 1e-9
    );

    // The loser is kept in the persisted document, flagged dead.
    let state = sim.to_state();
    assert_eq!(state.objects.len(), 2);
    let dead: Vec<_> = state.objects.iter().filter(|o| !o.exist).collect();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].id, "light");
}

#[test]
fn test_too_fast_step_aborts_batch() {
    let mut sim = Simulation::with_seed(1);
    sim.add_body(sun());
    sim.add_body(earth());
    sim.add_body(moon());
    // Populate the master index so Hill radii are known.
    sim.simulate(0, false);
    assert_eq!(sim.masters().hill_master("Moon"), Some("Earth"));

    sim.set_time_step_scale(2000.0);
    let result = sim.simulate(10, true);
    assert_eq!(result, StepResult::TooFast);
    assert_eq!(sim.body_count(), 3);
    // The offending sub-step never completed.
    assert_eq!(sim.time(), 0.0);
}

#[test]
fn test_roche_exposure_accumulates() {
    let mut sim = Simulation::with_seed(1);
    sim.add_body(Body::new(
        "Planet",
        5.972e24,
        Vector3::zeros(),
        Vector3::zeros(),
        6.378e6,
        6.378e6,
    ));
    // Inside the rigid Roche limit (~8e6 m) but outside contact range, on a
    // circular orbit so one step cannot crash it into the planet.
    let r = 7.5e6;
    let v = (G * 5.972e24 / r).sqrt();
    let mut moonlet = Body::new(
        "Moonlet",
        2.3e19,
        Vector3::new(r, 0.0, 0.0),
        Vector3::new(0.0, v, 0.0),
        1.0e5,
        1.0e5,
    );
    moonlet.time_inside_roche_limit = 0.0;
    sim.add_body(moonlet);

    sim.simulate(1, true);
    let exposure = sim.body("Moonlet").unwrap().time_inside_roche_limit;
    assert_relative_eq!(exposure, 60.0, max_relative = 1e-12);
}

#[test]
fn test_breakup_draws_once_per_batch() {
    let mut sim = Simulation::with_seed(1);
    sim.add_body(Body::new(
        "Planet",
        5.972e24,
        Vector3::zeros(),
        Vector3::zeros(),
        6.378e6,
        6.378e6,
    ));
    let r = 7.5e6;
    let v = (G * 5.972e24 / r).sqrt();
    let mut moonlet = Body::new(
        "Moonlet",
        2.3e19,
        Vector3::new(r, 0.0, 0.0),
        Vector3::new(0.0, v, 0.0),
        1.0e5,
        1.0e5,
    );
    // Dwell time long enough that the trigger probability rounds to one.
    moonlet.time_inside_roche_limit = 1.0e10;
    sim.add_body(moonlet);

    let result = sim.simulate(150, true);
    assert_eq!(result, StepResult::NumChanged);
    // One trigger draw per batch, so exactly one fragment regardless of
    // how many sub-steps the batch was divided into.
    assert_eq!(sim.body_count(), 3);
    let fragment = sim.body("Moonlet debris").unwrap();
    assert_eq!(fragment.debris_level, 1);
    // The parent's exposure clock restarts after the breakup.
    assert_eq!(sim.body("Moonlet").unwrap().time_inside_roche_limit, 0.0);
}

#[test]
fn test_two_body_orbit_closes_after_one_period() {
    let mut sim = sun_earth();
    let period =
        std::f64::consts::TAU * (AU.powi(3) / (G * (SOLAR_MASS + EARTH_MASS))).sqrt();
    let steps = (period / sim.time_step()).round() as usize;
    sim.simulate(steps, true);

    // After one Kepler period the Earth is back where it started relative
    // to the Sun, to within half a timestep of along-track motion.
    let offset = sim.body("Earth").unwrap().position - sim.body("Sun").unwrap().position;
    let start = Vector3::new(AU, 0.0, 0.0);
    assert!(
        (offset - start).norm() < 1.0e-4 * AU,
        "orbit failed to close: off by {} m",
        (offset - start).norm()
    );
    assert_relative_eq!(offset.norm(), AU, max_relative = 1e-4);
}

#[test]
fn test_paths_recorded_and_throttled() {
    let mut sim = sun_earth();
    // 120 minutes of simulated time at a one-hour recording interval.
    sim.simulate(120, false);
    let path = sim.path_of("Earth").unwrap();
    assert!(!path.is_empty());
    assert!(path.len() <= 3);
    assert!(path.latest().unwrap().time <= sim.time());
    assert!(!sim.barycenter_path().is_empty());
}

#[test]
fn test_high_performance_skips_paths() {
    let mut sim = sun_earth();
    sim.simulate(120, true);
    assert!(sim.path_of("Earth").unwrap().is_empty());
}

#[test]
fn test_star_status_and_light_transport() {
    let mut sim = sun_earth();
    sim.simulate(10, false);

    let sun = sim.body("Sun").unwrap();
    match &sun.status {
        celestial::BodyStatus::Star { luminosity, .. } => {
            assert_relative_eq!(*luminosity, SOLAR_LUMINOSITY, max_relative = 1e-9);
        }
        other => panic!("expected a star, got {:?}", other),
    }

    // The Earth absorbed ten minutes of sunlight.
    let earth = sim.body("Earth").unwrap();
    assert!(earth.surface_thermal_energy > 0.0);
}

#[test]
fn test_rotation_advances_in_full_mode() {
    let mut sim = sun_earth();
    let mut spinner = earth();
    spinner.name = "Spinner".to_string();
    spinner.position.y = -AU;
    spinner.set_spin(Vector3::z(), 7.292e-5);
    sim.add_body(spinner);

    sim.simulate(100, false);
    let body = sim.body("Spinner").unwrap();
    assert!(body.rotation_angle > 0.0);
    assert!(body.rotation_angle < 360.0);
}

#[test]
fn test_state_round_trips_through_json() {
    let mut sim = Simulation::with_seed(1);
    sim.add_body(sun());
    sim.add_body(earth());
    sim.add_body(moon());
    sim.simulate(100, true);

    let state = sim.to_state();
    let json = persist::to_json(&state).unwrap();
    let reloaded = persist::from_json(&json).unwrap();
    assert_eq!(reloaded, state);

    let restored = Simulation::from_state(&reloaded);
    assert_eq!(restored.body_count(), 3);
    assert_relative_eq!(restored.time(), sim.time(), max_relative = 1e-12);
    for body in sim.bodies() {
        let twin = restored.body(&body.name).unwrap();
        for i in 0..3 {
            assert_relative_eq!(twin.position[i], body.position[i], max_relative = 1e-12);
            assert_relative_eq!(twin.velocity[i], body.velocity[i], max_relative = 1e-12);
        }
    }
    // Derived structure is rebuilt, not loaded.
    assert_eq!(restored.masters().hill_master("Moon"), Some("Earth"));
    assert_eq!(restored.hierarchy().node_of("Moon").unwrap().level, 2);
}

#[test]
fn test_empty_simulation_advances_time() {
    let mut sim = Simulation::new();
    assert_eq!(sim.simulate(5, false), StepResult::Normal);
    assert_relative_eq!(sim.time(), 300.0, max_relative = 1e-12);
}

#[test]
fn test_force_stats_reflect_cutoff() {
    let mut sim = sun_earth();
    sim.set_epsilon(0.0);
    sim.simulate(1, true);
    assert_eq!(sim.last_force_stats().pairs_evaluated, 1);
}

#[test]
#[should_panic(expected = "time step scale must be positive")]
fn test_rejects_nonpositive_scale() {
    Simulation::new().set_time_step_scale(0.0);
}
