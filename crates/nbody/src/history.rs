//! Bounded trailing-position histories.
//!
//! The simulation records a sampled trail of positions per body (and one for
//! the system barycenter) for the UI to draw. Recording is throttled to a
//! minimum simulated-time interval and the buffer is pruned lazily once it
//! grows past the cap, so an arbitrarily long run holds a bounded trail.

use std::collections::VecDeque;

use nalgebra::Vector3;

use crate::consts::{MAX_PATH_POINTS, PATH_INTERVAL};

/// One recorded trail sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    /// Simulation time of the sample (s)
    pub time: f64,
    /// Position at that time (m)
    pub position: Vector3<f64>,
}

/// Bounded, time-throttled position trail.
#[derive(Debug, Clone, Default)]
pub struct PathHistory {
    points: VecDeque<PathPoint>,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sample unless the previous one is closer than
    /// [`PATH_INTERVAL`] in simulated time, then prunes to
    /// [`MAX_PATH_POINTS`].
    pub fn record(&mut self, time: f64, position: Vector3<f64>) {
        if let Some(last) = self.points.back() {
            if time - last.time < PATH_INTERVAL {
                return;
            }
        }
        self.points.push_back(PathPoint { time, position });
        self.prune();
    }

    /// Drops oldest points until the cap holds.
    fn prune(&mut self) {
        while self.points.len() > MAX_PATH_POINTS {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&PathPoint> {
        self.points.back()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
