//! Gravity/Hill mastery relations and the orbital hierarchy tree.
//!
//! Every tick the engine recomputes, per body, which heavier body dominates
//! it (`gravity master`), which Hill sphere it sits inside (`hill master`),
//! and its own Hill radius. The hierarchy tree (star → planet → moon) is
//! then rebuilt from scratch from the hill-master relation; nothing is
//! patched incrementally, so stale links cannot survive a tick.

use std::collections::{HashMap, HashSet};

use celestial::Body;
use nalgebra::Vector3;

use crate::consts::MASTER_MAX_MASS_RATIO;
use crate::forces::force_magnitude;
use crate::orbit::OrbitalElements;

/// Per-body mastery information for one tick.
#[derive(Debug, Clone)]
pub struct MasterInfo {
    /// Heavier body exerting the strongest force, if any plausible one exists
    pub gravity_master: Option<String>,
    /// Body whose Hill sphere most tightly contains this one; `None` makes
    /// this body a hierarchy root
    pub hill_master: Option<String>,
    /// Hill radius against the hill master (m); infinite for roots
    pub hill_radius: f64,
}

/// Hill radius of a body of mass `m` orbiting a master of mass `m_master`,
/// from the two-body relative state: `a (1 − e) · cbrt(m / 3 M)`.
///
/// Falls back to the instantaneous separation in place of the periapsis when
/// the relative orbit is degenerate or non-elliptical, so a hyperbolic flyby
/// still gets a finite, positive sphere of influence.
pub fn hill_radius(
    g: f64,
    m: f64,
    m_master: f64,
    relative_position: &Vector3<f64>,
    relative_velocity: &Vector3<f64>,
) -> f64 {
    let mu = g * (m + m_master);
    let periapsis_scale =
        match OrbitalElements::from_state_vectors(relative_position, relative_velocity, mu) {
            Ok(elements) if elements.is_elliptical() => {
                elements.semi_major_axis * (1.0 - elements.eccentricity)
            }
            _ => relative_position.norm(),
        };
    periapsis_scale * (m / (3.0 * m_master)).cbrt()
}

/// Mastery index over the live bodies, rebuilt wholesale by
/// [`Masters::update`].
#[derive(Debug, Clone, Default)]
pub struct Masters {
    map: HashMap<String, MasterInfo>,
}

impl Masters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, name: &str) -> Option<&MasterInfo> {
        self.map.get(name)
    }

    pub fn hill_master(&self, name: &str) -> Option<&str> {
        self.map.get(name)?.hill_master.as_deref()
    }

    pub fn gravity_master(&self, name: &str) -> Option<&str> {
        self.map.get(name)?.gravity_master.as_deref()
    }

    /// Hill radius for a body; `None` if the body is unknown.
    pub fn hill_radius(&self, name: &str) -> Option<f64> {
        self.map.get(name).map(|i| i.hill_radius)
    }

    /// Recomputes every body's gravity master, hill master and Hill radius.
    ///
    /// Three passes over the ordered-pair force table:
    ///
    /// 1. Gravity master: the heavier candidate exerting the single largest
    ///    force, rejected when it is implausibly heavier than the body
    ///    (mass ratio above [`MASTER_MAX_MASS_RATIO`]). An initial Hill
    ///    radius is computed against it.
    /// 2. Hill master: starts as the gravity master (none for the most
    ///    massive body), then refined to the heavier candidate whose Hill
    ///    sphere contains the body with the smallest radius fraction. Roots
    ///    carry an infinite Hill radius and never participate in the
    ///    containment test, so nesting is strict.
    /// 3. The Hill radius is recomputed against the final hill master.
    pub fn update(&mut self, bodies: &[Body], g: f64, power: f64) {
        self.map.clear();
        if bodies.is_empty() {
            return;
        }

        let n = bodies.len();
        let heaviest = (0..n)
            .max_by(|&a, &b| bodies[a].mass.total_cmp(&bodies[b].mass))
            .unwrap();

        // Pass 1: gravity masters and initial Hill radii.
        let mut gravity_master: Vec<Option<usize>> = vec![None; n];
        let mut initial_hill: Vec<f64> = vec![f64::INFINITY; n];
        for i in 0..n {
            let bi = &bodies[i];
            let mut best: Option<(usize, f64)> = None;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let bj = &bodies[j];
                if bj.mass <= bi.mass || bj.mass > bi.mass * MASTER_MAX_MASS_RATIO {
                    continue;
                }
                let d = bi.distance_to(bj);
                if d <= 0.0 {
                    continue;
                }
                let f = force_magnitude(g, power, bi.mass, bj.mass, d);
                let better = match best {
                    None => true,
                    // On a force tie the lighter candidate wins.
                    Some((k, best_f)) => f > best_f || (f == best_f && bj.mass < bodies[k].mass),
                };
                if better {
                    best = Some((j, f));
                }
            }
            if let Some((j, _)) = best {
                gravity_master[i] = Some(j);
                initial_hill[i] = hill_radius(
                    g,
                    bi.mass,
                    bodies[j].mass,
                    &(bi.position - bodies[j].position),
                    &(bi.velocity - bodies[j].velocity),
                );
            }
        }

        // Pass 2: hill-master refinement by tightest containing Hill sphere.
        let mut hill_master: Vec<Option<usize>> = vec![None; n];
        for i in 0..n {
            if i == heaviest {
                continue;
            }
            let bi = &bodies[i];
            let mut chosen = gravity_master[i];
            let mut best_fraction = f64::INFINITY;
            for j in 0..n {
                if i == j || bodies[j].mass <= bi.mass {
                    continue;
                }
                let sphere = initial_hill[j];
                if !sphere.is_finite() || sphere <= 0.0 {
                    continue;
                }
                let fraction = bi.distance_to(&bodies[j]) / sphere;
                if fraction < 1.0 && fraction < best_fraction {
                    best_fraction = fraction;
                    chosen = Some(j);
                }
            }
            hill_master[i] = chosen;
        }

        // Pass 3: final Hill radii against the chosen hill masters.
        for i in 0..n {
            let bi = &bodies[i];
            let (master_name, gravity_name, radius) = match hill_master[i] {
                Some(j) => {
                    let bj = &bodies[j];
                    let r = hill_radius(
                        g,
                        bi.mass,
                        bj.mass,
                        &(bi.position - bj.position),
                        &(bi.velocity - bj.velocity),
                    );
                    (
                        Some(bj.name.clone()),
                        gravity_master[i].map(|k| bodies[k].name.clone()),
                        r,
                    )
                }
                None => (
                    None,
                    gravity_master[i].map(|k| bodies[k].name.clone()),
                    f64::INFINITY,
                ),
            };
            self.map.insert(
                bi.name.clone(),
                MasterInfo {
                    gravity_master: gravity_name,
                    hill_master: master_name,
                    hill_radius: radius,
                },
            );
        }
    }
}

/// One node of the rebuilt hierarchy tree.
///
/// Wraps exactly one body; `mass`, `position` and `velocity` aggregate the
/// whole subtree including the node's own body (mass-weighted barycenter).
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// Name of the wrapped body
    pub name: String,
    /// Mass of the wrapped body alone (kg)
    pub body_mass: f64,
    /// Total subtree mass (kg)
    pub mass: f64,
    /// Subtree barycenter position (m)
    pub position: Vector3<f64>,
    /// Subtree barycenter velocity (m/s)
    pub velocity: Vector3<f64>,
    /// Distance from this node's root (root = 0)
    pub level: u32,
    /// Child node indices
    pub children: Vec<usize>,
    /// Parent node index, `None` for roots
    pub parent: Option<usize>,
}

/// Hierarchy tree over the live bodies, fully rebuilt each tick.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    roots: Vec<usize>,
    index: HashMap<String, usize>,
}

impl Hierarchy {
    /// Builds the tree from the current hill-master relation.
    ///
    /// Children of a node are exactly the live bodies whose hill master is
    /// that node's body. A per-call visited set guards the recursive
    /// barycenter aggregation: a child already claimed elsewhere (which a
    /// consistent master relation cannot produce, but a mid-tick
    /// inconsistency could) is dropped rather than recursed into, so the
    /// build always terminates.
    pub fn build(bodies: &[Body], masters: &Masters) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(bodies.len()),
            roots: Vec::new(),
            index: HashMap::with_capacity(bodies.len()),
        };

        for body in bodies.iter().filter(|b| b.exist) {
            let idx = tree.nodes.len();
            tree.index.insert(body.name.clone(), idx);
            tree.nodes.push(HierarchyNode {
                name: body.name.clone(),
                body_mass: body.mass,
                mass: body.mass,
                position: body.position,
                velocity: body.velocity,
                level: 0,
                children: Vec::new(),
                parent: None,
            });
        }

        // Wire children from the master relation; dead or unknown masters
        // leave the body a root.
        for i in 0..tree.nodes.len() {
            let master_idx = masters
                .hill_master(&tree.nodes[i].name)
                .and_then(|m| tree.index.get(m).copied());
            match master_idx {
                Some(p) if p != i => {
                    tree.nodes[i].parent = Some(p);
                    tree.nodes[p].children.push(i);
                }
                _ => tree.roots.push(i),
            }
        }

        let mut visited = HashSet::with_capacity(tree.nodes.len());
        let roots = tree.roots.clone();
        for root in roots {
            tree.aggregate(root, 0, &mut visited);
        }
        // Anything unreachable from a root (a residual cycle) is orphaned:
        // detach it and aggregate it as its own root so totals stay sane.
        for i in 0..tree.nodes.len() {
            if !visited.contains(&i) {
                tree.nodes[i].parent = None;
                tree.roots.push(i);
                tree.aggregate(i, 0, &mut visited);
            }
        }

        tree
    }

    /// Post-order barycenter aggregation with the visited guard.
    fn aggregate(&mut self, idx: usize, level: u32, visited: &mut HashSet<usize>) {
        if !visited.insert(idx) {
            return;
        }
        self.nodes[idx].level = level;

        // Drop children that were already visited through another parent.
        let children: Vec<usize> = self.nodes[idx]
            .children
            .iter()
            .copied()
            .filter(|c| !visited.contains(c))
            .collect();
        self.nodes[idx].children = children.clone();

        let mut mass = self.nodes[idx].body_mass;
        let mut weighted_position = self.nodes[idx].position * mass;
        let mut weighted_velocity = self.nodes[idx].velocity * mass;
        for child in children {
            self.aggregate(child, level + 1, visited);
            let node = &self.nodes[child];
            mass += node.mass;
            weighted_position += node.position * node.mass;
            weighted_velocity += node.velocity * node.mass;
        }
        let node = &mut self.nodes[idx];
        node.mass = mass;
        node.position = weighted_position / mass;
        node.velocity = weighted_velocity / mass;
    }

    /// Node wrapping the named body, if it is part of the tree.
    pub fn node_of(&self, name: &str) -> Option<&HierarchyNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    /// Parent node of the named body's node.
    pub fn parent_of(&self, name: &str) -> Option<&HierarchyNode> {
        let node = self.node_of(name)?;
        node.parent.map(|p| &self.nodes[p])
    }

    /// All root nodes (bodies with no hill master).
    pub fn roots(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.roots.iter().map(|&i| &self.nodes[i])
    }

    /// Child nodes of the named body's node.
    pub fn children_of(&self, name: &str) -> Vec<&HierarchyNode> {
        match self.node_of(name) {
            Some(node) => node.children.iter().map(|&c| &self.nodes[c]).collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
