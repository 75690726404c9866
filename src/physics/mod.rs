//! Physics module
//!
//! Rigidbody integration runs in the PhysicsUpdate phase. Collision is
//! detection only: shapes can be tested for overlap but contacts are never
//! resolved.

mod collision;
mod integrate;

pub use collision::{PlacedShape, overlapping, overlaps, shapes_overlap};
pub use integrate::integrate;
