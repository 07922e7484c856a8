//! Gravitational N-body engine with orbital-structure extraction.
//!
//! The engine advances a variable-size set of [`celestial::Body`] objects
//! with a fixed-timestep leapfrog integrator, evaluates pairwise gravity in
//! parallel with an adaptive distance cutoff, merges colliding bodies,
//! fragments bodies held inside a Roche limit, couples spin to orbit through
//! tidal braking, and rebuilds a Hill-sphere hierarchy (star → planet →
//! moon) every tick for downstream visualization.
//!
//! Entry point: [`simulator::Simulation`].

pub mod collisions;
pub mod consts;
pub mod forces;
pub mod hierarchy;
pub mod history;
pub mod lagrange;
pub mod orbit;
pub mod persist;
pub mod roche;
pub mod simulator;
pub mod tides;
pub mod vecmath;

#[cfg(test)]
mod hierarchy_test;
#[cfg(test)]
mod lagrange_test;
#[cfg(test)]
mod simulator_test;
#[cfg(test)]
mod tides_test;

pub use orbit::OrbitalElements;
pub use simulator::{Simulation, StepResult};
