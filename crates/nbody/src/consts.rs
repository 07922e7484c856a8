//! Engine tuning constants.
//!
//! Physical constants live in [`celestial::consts`]; everything here is a
//! knob of the numerical scheme itself.

/// Pair-count threshold below which a force-summation range runs serially
/// instead of being split across the rayon pool.
pub const SERIAL_PAIR_THRESHOLD: usize = 4096;

/// Eccentricity at and above which an orbit is treated as non-elliptical;
/// period and apsides are undefined past this point.
pub const NON_ELLIPTICAL_ECCENTRICITY: f64 = 0.999;

/// Largest plausible mass ratio between a body and its gravity master.
/// Candidates more than this factor heavier are rejected as masters.
pub const MASTER_MAX_MASS_RATIO: f64 = 1.0e10;

/// Fraction of a body's Hill radius it may traverse in one step before the
/// step is flagged as too fast.
pub const TOO_FAST_HILL_FRACTION: f64 = 0.5;

/// Minimum simulated time between recorded path points (s).
pub const PATH_INTERVAL: f64 = 3600.0;

/// Cap on the number of recorded points per path; older points are
/// garbage-collected lazily once the cap is exceeded.
pub const MAX_PATH_POINTS: usize = 3000;

/// Breakup hazard rate inside a Roche limit (s⁻¹): the per-macro-step
/// breakup probability is `1 − exp(−λ · time_inside)`.
pub const ROCHE_BREAK_RATE: f64 = 1.0e-5;

/// Fraction of the parent's mass carved off by one tidal breakup.
pub const DEBRIS_MASS_FRACTION: f64 = 0.1;

/// Maximum breakup generation; debris at this level never fragments again.
pub const MAX_DEBRIS_LEVEL: u32 = 3;
