//! Pairwise force evaluation with adaptive cutoff and parallel
//! decomposition.
//!
//! The force law is the generalized inverse power form
//! `F = G m₁ m₂ / rᵖ` applied along the separation unit vector, equal and
//! opposite on the two bodies. Pairs whose separation exceeds the distance
//! at which the pair force drops below a per-call `cut_off_force` threshold
//! are skipped entirely; this is an O(n²) pruning heuristic, not a spatial
//! tree.
//!
//! The pair double-loop is decomposed by recursively splitting the outer
//! index range and handing the halves to the rayon pool. Every task writes
//! into its own full-length accumulator buffer and the buffers are summed
//! after the join, so each slot always has exactly one writer.

use celestial::Body;
use nalgebra::Vector3;

use crate::consts::SERIAL_PAIR_THRESHOLD;

/// Parameters of one force-evaluation macro call.
#[derive(Debug, Clone, Copy)]
pub struct ForceParams {
    /// Gravitational constant
    pub g: f64,
    /// Force-law distance exponent `p` (2 for Newtonian gravity)
    pub power: f64,
    /// Pair force threshold below which a pair is skipped; `<= 0` disables
    /// the cutoff
    pub cut_off_force: f64,
}

/// Diagnostics from one force evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForceStats {
    /// Number of (i, j) pairs actually evaluated (within the cutoff)
    pub pairs_evaluated: usize,
}

/// Force exerted on `a` by `b` under the generalized law (N).
pub fn pair_force(g: f64, power: f64, a: &Body, b: &Body) -> Vector3<f64> {
    let dr = b.position - a.position;
    let d = dr.norm();
    if d <= 0.0 {
        return Vector3::zeros();
    }
    dr * (g * a.mass * b.mass / d.powf(power + 1.0))
}

/// Magnitude of the force between two point masses at distance `d` (N).
pub fn force_magnitude(g: f64, power: f64, m1: f64, m2: f64, d: f64) -> f64 {
    g * m1 * m2 / d.powf(power)
}

/// Separation beyond which a pair's force falls under `cut_off_force` (m).
///
/// Infinite when the cutoff is disabled, so every pair is evaluated.
pub fn cut_off_distance(g: f64, power: f64, m1: f64, m2: f64, cut_off_force: f64) -> f64 {
    if cut_off_force <= 0.0 {
        f64::INFINITY
    } else {
        (g * m1 * m2 / cut_off_force).powf(1.0 / power)
    }
}

/// Derives the global pair-force threshold for one macro call.
///
/// The threshold is the force between two bodies of the geometric-mean
/// ("typical") mass at the geometric-mean pairwise separation, scaled by
/// `epsilon`. Larger `epsilon` means a higher threshold, shorter cutoff
/// distances and fewer pairs evaluated; `epsilon = 0` disables pruning.
pub fn derive_cut_off_force(bodies: &[Body], g: f64, power: f64, epsilon: f64) -> f64 {
    let n = bodies.len();
    if n < 2 || epsilon <= 0.0 {
        return 0.0;
    }

    let mean_log_mass = bodies.iter().map(|b| b.mass.ln()).sum::<f64>() / n as f64;
    let typical_mass = mean_log_mass.exp();

    let mut log_distance_sum = 0.0;
    let mut pairs = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            let d = (bodies[i].position - bodies[j].position).norm();
            if d > 0.0 {
                log_distance_sum += d.ln();
                pairs += 1;
            }
        }
    }
    if pairs == 0 {
        return 0.0;
    }
    let typical_distance = (log_distance_sum / pairs as f64).exp();

    epsilon * force_magnitude(g, power, typical_mass, typical_mass, typical_distance)
}

/// Number of (i, j) pairs covered by outer rows `[lo, hi)` of an `n`-body
/// triangle loop.
fn pair_count(lo: usize, hi: usize, n: usize) -> usize {
    // Row i covers n - 1 - i inner iterations.
    (lo..hi).map(|i| n - 1 - i).sum()
}

/// Serial kernel over outer rows `[lo, hi)`, accumulating into `buf`.
fn accumulate_rows(
    bodies: &[Body],
    params: &ForceParams,
    lo: usize,
    hi: usize,
    buf: &mut [Vector3<f64>],
) -> usize {
    let n = bodies.len();
    let mut evaluated = 0;
    for i in lo..hi {
        let bi = &bodies[i];
        for j in (i + 1)..n {
            let bj = &bodies[j];
            let dr = bj.position - bi.position;
            let d = dr.norm();
            if d <= 0.0 {
                continue;
            }
            if d > cut_off_distance(params.g, params.power, bi.mass, bj.mass, params.cut_off_force)
            {
                continue;
            }
            // F = G m1 m2 / d^p along dr; dividing by d^(p+1) folds in the
            // unit vector.
            let f = dr * (params.g * bi.mass * bj.mass / d.powf(params.power + 1.0));
            buf[i] += f;
            buf[j] -= f;
            evaluated += 1;
        }
    }
    evaluated
}

/// Recursive range split: small ranges run inline, large ones fork into the
/// rayon pool. Each branch owns its buffer; buffers merge after the join.
fn accumulate_split(
    bodies: &[Body],
    params: &ForceParams,
    lo: usize,
    hi: usize,
) -> (Vec<Vector3<f64>>, usize) {
    let n = bodies.len();
    if pair_count(lo, hi, n) <= SERIAL_PAIR_THRESHOLD || hi - lo <= 1 {
        let mut buf = vec![Vector3::zeros(); n];
        let evaluated = accumulate_rows(bodies, params, lo, hi, &mut buf);
        return (buf, evaluated);
    }

    let mid = lo + (hi - lo) / 2;
    let ((mut left, left_count), (right, right_count)) = rayon::join(
        || accumulate_split(bodies, params, lo, mid),
        || accumulate_split(bodies, params, mid, hi),
    );
    for (l, r) in left.iter_mut().zip(right.iter()) {
        *l += r;
    }
    (left, left_count + right_count)
}

/// Computes the net force on every body, writing into `out`.
///
/// `out` is zeroed first and must have the same length as `bodies`. Newton's
/// third law holds exactly: each pair is evaluated once and applied with
/// opposite signs.
///
/// # Panics
///
/// Panics if `out.len() != bodies.len()`.
pub fn accumulate_forces(
    bodies: &[Body],
    params: &ForceParams,
    out: &mut [Vector3<f64>],
) -> ForceStats {
    assert_eq!(
        out.len(),
        bodies.len(),
        "force buffer length must match body count"
    );
    for f in out.iter_mut() {
        *f = Vector3::zeros();
    }
    if bodies.len() < 2 {
        return ForceStats::default();
    }

    let (buf, evaluated) = accumulate_split(bodies, params, 0, bodies.len());
    out.copy_from_slice(&buf);
    ForceStats {
        pairs_evaluated: evaluated,
    }
}
