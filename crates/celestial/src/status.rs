//! Polymorphic per-tick role of a body.
//!
//! A body may act as a star (luminous, with a corona, stellar wind and a
//! habitable zone) or as a comet (sublimating ice with a tail). The role is
//! a tagged union re-derived each tick from mass and surface temperature,
//! never a stored subtype, so a body that gains or loses mass migrates
//! between roles automatically.

use nalgebra::Vector3;

use crate::body::Body;
use crate::body_type::BodyType;
use crate::consts::{AU, HYDROGEN_BURNING_MASS, SOLAR_LUMINOSITY, SOLAR_MASS};

/// Surface temperature above which exposed ice sublimates noticeably (K).
const SUBLIMATION_TEMPERATURE: f64 = 150.0;

/// Latent heat of sublimation of water ice (J/kg).
const ICE_SUBLIMATION_HEAT: f64 = 2.8e6;

/// Role a body currently plays, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyStatus {
    /// No special role.
    None,
    /// Hydrogen-burning star.
    Star {
        /// Total radiated power (W)
        luminosity: f64,
        /// Corona temperature (K)
        corona_temperature: f64,
        /// Stellar wind speed (m/s)
        stellar_wind_speed: f64,
        /// Habitable-zone bounds `(inner, outer)` from the star (m)
        habitable_zone: (f64, f64),
    },
    /// Sublimating icy body.
    Comet {
        /// Mass-loss rate from sublimation (kg/s)
        sublimation_rate: f64,
        /// Current tail length (m)
        tail_length: f64,
        /// Unit vector the tail points along (anti-sunward)
        tail_direction: Vector3<f64>,
    },
}

impl BodyStatus {
    pub fn is_star(&self) -> bool {
        matches!(self, BodyStatus::Star { .. })
    }

    pub fn is_comet(&self) -> bool {
        matches!(self, BodyStatus::Comet { .. })
    }

    /// Derives the status a body should carry right now.
    ///
    /// * Mass at or above the hydrogen-burning threshold ⇒ [`BodyStatus::Star`],
    ///   with luminosity from the main-sequence mass-luminosity relation and
    ///   the habitable zone from the stellar-flux bounds.
    /// * An icy body whose skin is warm enough to sublimate ⇒
    ///   [`BodyStatus::Comet`], with the tail pointing away from the
    ///   dominant light source (`anti_star_direction`), if one is known.
    /// * Anything else ⇒ [`BodyStatus::None`].
    pub fn evaluate(body: &Body, anti_star_direction: Option<Vector3<f64>>) -> BodyStatus {
        if body.mass >= HYDROGEN_BURNING_MASS {
            return Self::star_from_mass(body.mass);
        }

        let temperature = body.surface_temperature();
        if body.body_type == BodyType::Ice && temperature > SUBLIMATION_TEMPERATURE {
            // Power available to drive sublimation: the skin's own thermal
            // emission above the sublimation point.
            let excess = temperature - SUBLIMATION_TEMPERATURE;
            let sublimation_rate =
                body.emissivity * body.surface_area() * excess / ICE_SUBLIMATION_HEAT;
            // Tail scale grows with the mass-loss rate; purely a
            // visualization aid, not dynamical.
            let tail_length = 1.0e4 * sublimation_rate.max(0.0) * body.average_radius().sqrt();
            return BodyStatus::Comet {
                sublimation_rate,
                tail_length,
                tail_direction: anti_star_direction.unwrap_or_else(Vector3::x),
            };
        }

        BodyStatus::None
    }

    /// Star status for a given mass, main-sequence relations throughout.
    fn star_from_mass(mass: f64) -> BodyStatus {
        let solar_masses = mass / SOLAR_MASS;
        // Mass-luminosity relation L ∝ M^3.5 for the main sequence.
        let luminosity = SOLAR_LUMINOSITY * solar_masses.powf(3.5);
        // Corona temperature and wind speed scale weakly with mass; anchored
        // to solar values (1.5 MK, ~450 km/s).
        let corona_temperature = 1.5e6 * solar_masses.powf(0.5);
        let stellar_wind_speed = 4.5e5 * solar_masses.powf(0.25);
        // Kasting-style habitable-zone flux bounds: 1.1 S☉ inner, 0.53 S☉
        // outer, converted to distance in meters.
        let l_rel = luminosity / SOLAR_LUMINOSITY;
        let habitable_zone = (AU * (l_rel / 1.1).sqrt(), AU * (l_rel / 0.53).sqrt());
        BodyStatus::Star {
            luminosity,
            corona_temperature,
            stellar_wind_speed,
            habitable_zone,
        }
    }
}
