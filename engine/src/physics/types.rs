//! Physics type re-exports from glam
//!
//! This module provides the core mathematical types used throughout
//! the controller, re-exported from the glam library.
//!
//! The world is Z-up: floors face `UP`, dashes are flattened onto the
//! XY plane.

pub use glam::Vec3;

/// World up direction.
pub const UP: Vec3 = Vec3::Z;

/// Opaque identity of an actor placed in the world.
///
/// The character itself, level geometry and interactable objects all
/// carry one so traces can ignore the caster and report what they hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}
