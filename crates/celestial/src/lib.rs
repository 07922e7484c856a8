//! Physical model of individual celestial bodies.
//!
//! This crate owns everything that belongs to *one* body in isolation:
//! its mutable physical state ([`body::Body`]), its categorical class
//! ([`body_type::BodyType`]) with the thermal-skin constants that hang off it,
//! oblate-spheroid shape math, and the per-tick polymorphic status
//! ([`status::BodyStatus`]) a body may carry (star or comet).
//!
//! N-body dynamics, hierarchy building and persistence live in the `nbody`
//! crate; this crate deliberately knows nothing about other bodies except
//! through plain parameters (e.g. incident light flux).

pub mod body;
pub mod body_type;
pub mod consts;
pub mod schema;
pub mod shape;
pub mod status;

#[cfg(test)]
mod body_type_test;

pub use body::Body;
pub use body_type::BodyType;
pub use schema::BodyState;
pub use status::BodyStatus;
