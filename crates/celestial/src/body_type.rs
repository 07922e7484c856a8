//! Categorical classification of bodies and the constants keyed by it.
//!
//! The body type governs the thermal-skin model (how much of the body's mass
//! exchanges heat with space on simulation timescales) and how types combine
//! when bodies merge or fragment.

use serde::{Deserialize, Serialize};

use crate::consts::HYDROGEN_BURNING_MASS;

/// Categorical class of a celestial body.
///
/// Ordered by "evolutionary weight": a merger never produces a type with a
/// lower ordinal than either parent.
///
/// Serialized with the enum-name convention of the persisted schema
/// (`"ICE"`, `"TERRESTRIAL"`, `"ICE_GIANT"`, `"GAS_GIANT"`, `"STAR"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyType {
    Ice,
    Terrestrial,
    IceGiant,
    GasGiant,
    Star,
}

/// Mass thresholds for classification, in kg.
///
/// Chosen so the solar-system bodies land where expected: Pluto is icy, the
/// Moon and Mars are terrestrial, Uranus/Neptune are ice giants, Saturn and
/// Jupiter are gas giants.
const TERRESTRIAL_MIN_MASS: f64 = 5.0e22;
const ICE_GIANT_MIN_MASS: f64 = 5.0e25;
const GAS_GIANT_MIN_MASS: f64 = 3.0e26;

impl BodyType {
    /// Classifies a body purely by mass.
    ///
    /// Used for debris carved off by tidal breakup and when a body's class
    /// must be re-derived after losing mass.
    ///
    /// # Examples
    ///
    /// ```
    /// use celestial::BodyType;
    ///
    /// assert_eq!(BodyType::from_mass(1.989e30), BodyType::Star);
    /// assert_eq!(BodyType::from_mass(5.972e24), BodyType::Terrestrial);
    /// assert_eq!(BodyType::from_mass(1.3e22), BodyType::Ice);
    /// ```
    pub fn from_mass(mass: f64) -> Self {
        if mass >= HYDROGEN_BURNING_MASS {
            BodyType::Star
        } else if mass >= GAS_GIANT_MIN_MASS {
            BodyType::GasGiant
        } else if mass >= ICE_GIANT_MIN_MASS {
            BodyType::IceGiant
        } else if mass >= TERRESTRIAL_MIN_MASS {
            BodyType::Terrestrial
        } else {
            BodyType::Ice
        }
    }

    /// Resulting type when a body of type `self` (the heavier, surviving
    /// partner) absorbs a body of type `other`.
    ///
    /// The result is monotonically non-decreasing in ordinal. Giants and
    /// stars keep their own type regardless of what falls into them; smaller
    /// bodies take the larger ordinal of the pair.
    pub fn merged_with(self, other: BodyType) -> BodyType {
        match self {
            BodyType::IceGiant | BodyType::GasGiant | BodyType::Star => self,
            _ => self.max(other),
        }
    }

    /// Fraction of the body's total mass that participates in surface heat
    /// exchange (the "thermal skin").
    ///
    /// Gaseous bodies mix more of their envelope; rocky and icy bodies only
    /// exchange heat through a thin crust.
    pub fn thermal_skin_fraction(self) -> f64 {
        match self {
            BodyType::Ice => 1.0e-4,
            BodyType::Terrestrial => 1.0e-4,
            BodyType::IceGiant => 1.0e-3,
            BodyType::GasGiant => 1.0e-3,
            BodyType::Star => 1.0e-2,
        }
    }

    /// Specific heat capacity of the thermal skin (J kg⁻¹ K⁻¹).
    pub fn skin_heat_capacity(self) -> f64 {
        match self {
            BodyType::Ice => 2_100.0,
            BodyType::Terrestrial => 800.0,
            BodyType::IceGiant => 4_200.0,
            BodyType::GasGiant => 14_300.0,
            BodyType::Star => 15_000.0,
        }
    }
}
