//! The simulation orchestrator.
//!
//! [`Simulation`] owns the live bodies and drives the fixed-timestep
//! leapfrog loop: parallel force accumulation, collision merging, Roche
//! exposure accounting and bounded path recording per sub-step, then one
//! Roche breakup draw per call, and master/hierarchy rebuild, rotation
//! advance, tidal braking and status refresh outside high-performance mode.
//!
//! Everything here runs on the single orchestrating thread; only the force
//! stage fans out to the rayon pool, and it is joined before any state is
//! updated from it.

use std::collections::HashMap;
use std::fmt;

use celestial::consts::HYDROGEN_BURNING_MASS;
use celestial::{Body, BodyState, BodyStatus};
use log::{debug, warn};
use nalgebra::Vector3;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::collisions;
use crate::consts::TOO_FAST_HILL_FRACTION;
use crate::forces::{self, ForceParams, ForceStats};
use crate::hierarchy::{Hierarchy, Masters};
use crate::history::PathHistory;
use crate::orbit::{OrbitError, OrbitalElements};
use crate::persist::SimulationState;
use crate::roche;
use crate::tides;
use crate::vecmath::try_unit;

/// Outcome of one `simulate` call; the only signal callers get that the
/// object count or visualization state must refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// All requested sub-steps ran and the body count is unchanged.
    Normal,
    /// Bodies merged or fragmented; callers must re-query the body list.
    NumChanged,
    /// A body threatened to cross its Hill sphere in a single step; the
    /// remaining sub-steps were skipped. Partial progress is kept, the
    /// caller should retry with a smaller batch or timestep.
    TooFast,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepResult::Normal => "NORMAL",
            StepResult::NumChanged => "NUM_CHANGED",
            StepResult::TooFast => "TOO_FAST",
        };
        write!(f, "{}", s)
    }
}

/// Mutable references to two distinct slice elements.
fn two_mut<T>(slice: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    assert_ne!(i, j, "two_mut requires distinct indices");
    if i < j {
        let (left, right) = slice.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = slice.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

/// Gravitational N-body simulation state and orchestration.
pub struct Simulation {
    /// Live bodies, sorted by descending mass after every tick or insertion
    bodies: Vec<Body>,
    /// Bodies that lost a merger; kept for serialization (`exist == false`)
    graveyard: Vec<Body>,
    g: f64,
    gravity_dt_power: f64,
    epsilon: f64,
    dimension: u32,
    time_step: f64,
    time_step_scale: f64,
    time: f64,
    masters: Masters,
    hierarchy: Hierarchy,
    paths: HashMap<String, PathHistory>,
    barycenter_path: PathHistory,
    rng: ChaChaRng,
    /// Diagnostics from the most recent force evaluation
    last_force_stats: ForceStats,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates an empty simulation with SI defaults: Newtonian gravity
    /// (`p = 2`), a one-minute base timestep, and cutoff pruning enabled at
    /// a conservative `epsilon`.
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            graveyard: Vec::new(),
            g: celestial::consts::G,
            gravity_dt_power: 2.0,
            epsilon: 0.001,
            dimension: 3,
            time_step: 60.0,
            time_step_scale: 1.0,
            time: 0.0,
            masters: Masters::new(),
            hierarchy: Hierarchy::default(),
            paths: HashMap::new(),
            barycenter_path: PathHistory::new(),
            rng: ChaChaRng::seed_from_u64(0),
            last_force_stats: ForceStats::default(),
        }
    }

    /// Same as [`Simulation::new`] but with a chosen RNG seed, so breakup
    /// triggers are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        let mut sim = Self::new();
        sim.rng = ChaChaRng::seed_from_u64(seed);
        sim
    }

    // ------------------------------------------------------------------
    // Body management
    // ------------------------------------------------------------------

    /// Adds a body, assigning a collision-free name, and returns the final
    /// name. The live list stays sorted by descending mass.
    pub fn add_body(&mut self, mut body: Body) -> String {
        let name = self.unique_name(&body.name);
        body.name = name.clone();
        self.paths.insert(name.clone(), PathHistory::new());
        self.bodies.push(body);
        self.sort_by_mass();
        name
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.bodies.iter().any(|b| b.name == base) {
            return base.to_string();
        }
        let mut k = 2;
        loop {
            let candidate = format!("{} ({})", base, k);
            if !self.bodies.iter().any(|b| b.name == candidate) {
                return candidate;
            }
            k += 1;
        }
    }

    fn sort_by_mass(&mut self) {
        self.bodies.sort_by(|a, b| b.mass.total_cmp(&a.mass));
    }

    /// Live bodies in descending mass order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Accumulated simulated time (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn masters(&self) -> &Masters {
        &self.masters
    }

    /// Recorded trail for a body, if it is (still) live.
    pub fn path_of(&self, name: &str) -> Option<&PathHistory> {
        self.paths.get(name)
    }

    pub fn barycenter_path(&self) -> &PathHistory {
        &self.barycenter_path
    }

    /// Pair counts from the most recent force evaluation.
    pub fn last_force_stats(&self) -> ForceStats {
        self.last_force_stats
    }

    // ------------------------------------------------------------------
    // Tunables
    // ------------------------------------------------------------------

    /// Timestep multiplier (speed control).
    ///
    /// # Panics
    ///
    /// Panics if `scale` is not strictly positive.
    pub fn set_time_step_scale(&mut self, scale: f64) {
        assert!(scale > 0.0, "time step scale must be positive");
        self.time_step_scale = scale;
    }

    pub fn time_step_scale(&self) -> f64 {
        self.time_step_scale
    }

    /// Base timestep in seconds.
    pub fn set_time_step(&mut self, time_step: f64) {
        assert!(time_step > 0.0, "time step must be positive");
        self.time_step = time_step;
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Force-cutoff scale; larger values prune more pairs, `0` disables.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        assert!(epsilon >= 0.0, "epsilon must be non-negative");
        self.epsilon = epsilon;
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    // ------------------------------------------------------------------
    // Integration loop
    // ------------------------------------------------------------------

    /// Advances the simulation by `n_steps` leapfrog sub-steps.
    ///
    /// With `high_performance` set, path recording, master/hierarchy
    /// rebuild, rotation advance, tides and status refresh are skipped;
    /// only the raw dynamics run.
    pub fn simulate(&mut self, n_steps: usize, high_performance: bool) -> StepResult {
        let count_before = self.bodies.len();
        let dt = self.time_step * self.time_step_scale;
        let start_time = self.time;
        let mut aborted = false;

        // The cutoff threshold is derived once per macro call, not per
        // sub-step.
        let params = ForceParams {
            g: self.g,
            power: self.gravity_dt_power,
            cut_off_force: forces::derive_cut_off_force(
                &self.bodies,
                self.g,
                self.gravity_dt_power,
                self.epsilon,
            ),
        };

        for _ in 0..n_steps {
            if self.bodies.len() < 2 {
                self.time += dt;
                continue;
            }

            // Kick (half step) from step-start forces.
            let mut force = vec![Vector3::zeros(); self.bodies.len()];
            self.last_force_stats = forces::accumulate_forces(&self.bodies, &params, &mut force);
            for (body, f) in self.bodies.iter_mut().zip(force.iter()) {
                body.velocity += f / body.mass * (0.5 * dt);
            }

            if self.any_too_fast(dt) {
                warn!(
                    "step of {} s would carry a body across its Hill sphere; aborting batch",
                    dt
                );
                aborted = true;
                break;
            }

            // Drift (full step).
            for body in self.bodies.iter_mut() {
                let v = body.velocity;
                body.position += v * dt;
            }

            // Collisions may shrink the list; Roche exposure only keeps
            // the clocks ticking, breakup is decided once per call below.
            self.collision_pass();
            self.roche_exposure_pass(dt);

            // Kick (half step) from end-of-step forces.
            let mut force = vec![Vector3::zeros(); self.bodies.len()];
            self.last_force_stats = forces::accumulate_forces(&self.bodies, &params, &mut force);
            for (body, f) in self.bodies.iter_mut().zip(force.iter()) {
                body.velocity += f / body.mass * (0.5 * dt);
            }

            self.time += dt;

            if !high_performance {
                self.record_paths();
            }
        }

        for fragment in self.roche_breakup_pass() {
            debug!("debris spawned: {}", fragment.name);
            self.add_body(fragment);
        }

        let elapsed = self.time - start_time;
        let changed = self.bodies.len() != count_before;
        if changed {
            self.sort_by_mass();
            self.gc_paths();
        }

        if !high_performance {
            self.masters
                .update(&self.bodies, self.g, self.gravity_dt_power);
            self.hierarchy = Hierarchy::build(&self.bodies, &self.masters);
            for body in self.bodies.iter_mut() {
                body.advance_rotation(elapsed);
            }
            self.apply_tides(elapsed);
            self.refresh_statuses(elapsed);
        }

        if changed {
            StepResult::NumChanged
        } else if aborted {
            StepResult::TooFast
        } else {
            StepResult::Normal
        }
    }

    /// Whether any body would cross a disallowed fraction of its Hill
    /// sphere, relative to its hill master, within one step.
    fn any_too_fast(&self, dt: f64) -> bool {
        let index: HashMap<&str, usize> = self
            .bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.as_str(), i))
            .collect();
        for body in &self.bodies {
            let Some(info) = self.masters.info(&body.name) else {
                continue;
            };
            let Some(master_name) = info.hill_master.as_deref() else {
                continue;
            };
            let Some(&m) = index.get(master_name) else {
                continue;
            };
            if !info.hill_radius.is_finite() {
                continue;
            }
            let relative_speed = (body.velocity - self.bodies[m].velocity).norm();
            if relative_speed * dt > info.hill_radius * TOO_FAST_HILL_FRACTION {
                return true;
            }
        }
        false
    }

    /// Heaviest-first collision scan. A merge removes the lighter body
    /// immediately, so the affected inner scan is restarted rather than
    /// iterated over a stale index.
    fn collision_pass(&mut self) {
        let mut i = 0;
        while i < self.bodies.len() {
            let mut j = i + 1;
            while j < self.bodies.len() {
                if !collisions::are_colliding(&self.bodies[i], &self.bodies[j]) {
                    j += 1;
                    continue;
                }
                if self.bodies[i].mass >= self.bodies[j].mass {
                    let mut victim = self.bodies.remove(j);
                    victim.destroy(self.time);
                    collisions::merge(&mut self.bodies[i], &victim, self.g);
                    debug!("{} absorbed {}", self.bodies[i].name, victim.name);
                    self.graveyard.push(victim);
                    // The element at j is new; rescan it.
                } else {
                    let mut victim = self.bodies.remove(i);
                    victim.destroy(self.time);
                    // Removing index i shifted the receiver down by one.
                    let receiver = j - 1;
                    collisions::merge(&mut self.bodies[receiver], &victim, self.g);
                    debug!("{} absorbed {}", self.bodies[receiver].name, victim.name);
                    self.graveyard.push(victim);
                    // The body at i changed entirely; restart its scan.
                    j = i + 1;
                }
            }
            i += 1;
        }
    }

    /// Advances the Roche-limit exposure clock of every body currently
    /// inside some perturber's limit. No randomness here; the breakup
    /// decision belongs to [`Simulation::roche_breakup_pass`].
    fn roche_exposure_pass(&mut self, dt: f64) {
        for i in 0..self.bodies.len() {
            if roche::deepest_perturber(&self.bodies, i).is_some() {
                self.bodies[i].time_inside_roche_limit += dt;
            }
        }
    }

    /// Stochastic Roche breakup, run once per `simulate` call: each body
    /// still inside a perturber's limit gets a single trigger draw against
    /// its accumulated exposure time. The survival probability is therefore
    /// a function of total dwell time, not of how finely the batch was
    /// sub-stepped.
    fn roche_breakup_pass(&mut self) -> Vec<Body> {
        let mut debris = Vec::new();
        for i in 0..self.bodies.len() {
            if self.bodies[i].time_inside_roche_limit <= 0.0
                || self.bodies[i].debris_level >= crate::consts::MAX_DEBRIS_LEVEL
            {
                continue;
            }
            let Some(perturber) = roche::deepest_perturber(&self.bodies, i) else {
                continue;
            };
            let time_inside = self.bodies[i].time_inside_roche_limit;
            if roche::breakup_triggered(&mut self.rng, time_inside) {
                let (body, other) = two_mut(&mut self.bodies, i, perturber);
                if let Some(fragment) = roche::make_debris(body, other, self.time) {
                    debug!("{} broke up inside the Roche limit of {}", body.name, other.name);
                    debris.push(fragment);
                }
            }
        }
        debris
    }

    fn record_paths(&mut self) {
        let time = self.time;
        for body in &self.bodies {
            self.paths
                .entry(body.name.clone())
                .or_default()
                .record(time, body.position);
        }
        if let Some(barycenter) = self.barycenter() {
            self.barycenter_path.record(time, barycenter);
        }
    }

    /// Drops trails of bodies that no longer exist.
    fn gc_paths(&mut self) {
        let live: Vec<String> = self.bodies.iter().map(|b| b.name.clone()).collect();
        self.paths.retain(|name, _| live.iter().any(|l| l == name));
    }

    /// Applies tidal braking between every body and its hill master.
    fn apply_tides(&mut self, elapsed: f64) {
        if elapsed <= 0.0 {
            return;
        }
        let index: HashMap<String, usize> = self
            .bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.clone(), i))
            .collect();
        let pairs: Vec<(usize, usize)> = self
            .bodies
            .iter()
            .enumerate()
            .filter_map(|(i, b)| {
                let master = self.masters.hill_master(&b.name)?;
                let &m = index.get(master)?;
                (m != i).then_some((i, m))
            })
            .collect();
        for (i, m) in pairs {
            let (body, master) = two_mut(&mut self.bodies, i, m);
            tides::apply_tidal_braking(body, master, self.g, elapsed);
        }
    }

    /// Re-derives star/comet statuses, routes starlight, radiates surface
    /// heat and applies cometary mass loss.
    fn refresh_statuses(&mut self, elapsed: f64) {
        // Luminous sources first (position, luminosity).
        let stars: Vec<(Vector3<f64>, f64)> = self
            .bodies
            .iter()
            .filter(|b| b.mass >= HYDROGEN_BURNING_MASS)
            .map(|b| {
                let luminosity = match BodyStatus::evaluate(b, None) {
                    BodyStatus::Star { luminosity, .. } => luminosity,
                    _ => 0.0,
                };
                (b.position, luminosity)
            })
            .collect();

        for body in self.bodies.iter_mut() {
            if elapsed > 0.0 && body.mass < HYDROGEN_BURNING_MASS {
                for (position, luminosity) in &stars {
                    let d2 = (body.position - position).norm_squared();
                    if d2 > 0.0 {
                        let flux = luminosity / (4.0 * std::f64::consts::PI * d2);
                        body.receive_light(flux, elapsed);
                    }
                }
                body.radiate(elapsed);
            }

            // Tail points away from the dominant light source.
            let anti_star = stars
                .iter()
                .max_by(|a, b| {
                    let fa = a.1 / (body.position - a.0).norm_squared().max(1.0);
                    let fb = b.1 / (body.position - b.0).norm_squared().max(1.0);
                    fa.total_cmp(&fb)
                })
                .and_then(|(position, _)| try_unit(&(body.position - position)));
            body.status = BodyStatus::evaluate(body, anti_star);

            if elapsed > 0.0 {
                if let BodyStatus::Comet {
                    sublimation_rate, ..
                } = body.status
                {
                    // Sublimation never consumes more than a sliver of the
                    // nucleus in one call.
                    let loss = (sublimation_rate * elapsed).min(0.01 * body.mass);
                    body.mass -= loss;
                }
            }
        }
    }

    fn barycenter(&self) -> Option<Vector3<f64>> {
        let total: f64 = self.bodies.iter().map(|b| b.mass).sum();
        if total <= 0.0 {
            return None;
        }
        let weighted = self
            .bodies
            .iter()
            .fold(Vector3::zeros(), |acc, b| acc + b.position * b.mass);
        Some(weighted / total)
    }

    // ------------------------------------------------------------------
    // Aggregate queries
    // ------------------------------------------------------------------

    /// Total translational plus rotational kinetic energy (J).
    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.kinetic_energy() + b.rotational_kinetic_energy())
            .sum()
    }

    /// Total pairwise gravitational potential energy (J), generalized to
    /// the configured force-law exponent.
    pub fn total_potential_energy(&self) -> f64 {
        let p = self.gravity_dt_power;
        let mut total = 0.0;
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let a = &self.bodies[i];
                let b = &self.bodies[j];
                let d = a.distance_to(b);
                if d <= 0.0 {
                    continue;
                }
                total += if (p - 1.0).abs() < 1.0e-12 {
                    // F ∝ 1/r integrates to a logarithmic potential.
                    self.g * a.mass * b.mass * d.ln()
                } else {
                    -self.g * a.mass * b.mass * d.powf(1.0 - p) / (p - 1.0)
                };
            }
        }
        total
    }

    /// Total stored thermal energy, interior plus surface skin (J).
    pub fn total_internal_energy(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.internal_thermal_energy + b.surface_thermal_energy)
            .sum()
    }

    /// Orbital elements of `name` relative to `reference`.
    ///
    /// Returns `None` when either body is unknown; degenerate geometry
    /// surfaces as [`OrbitError::Degenerate`].
    pub fn orbital_elements_of(
        &self,
        name: &str,
        reference: &str,
    ) -> Option<Result<OrbitalElements, OrbitError>> {
        let body = self.body(name)?;
        let other = self.body(reference)?;
        let mu = self.g * (body.mass + other.mass);
        Some(OrbitalElements::from_state_vectors(
            &(body.position - other.position),
            &(body.velocity - other.velocity),
            mu,
        ))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Captures the persisted document: every live body (mass order) plus
    /// the graveyard.
    pub fn to_state(&self) -> SimulationState {
        let dimension = self.dimension as usize;
        let objects = self
            .bodies
            .iter()
            .chain(self.graveyard.iter())
            .map(|b| BodyState::capture(b, dimension))
            .collect();
        SimulationState {
            dimension: self.dimension,
            g: self.g,
            gravity_dt_power: self.gravity_dt_power,
            time_step: self.time_step,
            time_step_accumulator: self.time,
            epsilon: self.epsilon,
            objects,
        }
    }

    /// Rebuilds a simulation from a persisted document; masters, hierarchy
    /// and statuses are rederived rather than trusted from the file.
    pub fn from_state(state: &SimulationState) -> Self {
        let mut sim = Self::new();
        sim.dimension = state.dimension.clamp(2, 3);
        sim.g = state.g;
        sim.gravity_dt_power = state.gravity_dt_power;
        sim.time_step = state.time_step;
        sim.time = state.time_step_accumulator;
        sim.epsilon = state.epsilon;
        for record in &state.objects {
            let body = record.restore();
            if body.exist {
                sim.paths.insert(body.name.clone(), PathHistory::new());
                sim.bodies.push(body);
            } else {
                sim.graveyard.push(body);
            }
        }
        sim.sort_by_mass();
        sim.masters.update(&sim.bodies, sim.g, sim.gravity_dt_power);
        sim.hierarchy = Hierarchy::build(&sim.bodies, &sim.masters);
        sim
    }
}
