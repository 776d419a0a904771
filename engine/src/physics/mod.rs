//! Physics module
//!
//! The collaborators the player controller talks to: the world it traces
//! against and the character body whose movement parameters it drives.
//!
//! # Unit System
//!
//! **1 unit = 1 centimetre**, Z up.
//!
//! # Submodules
//!
//! - [`types`] - Math re-exports from glam, `UP`, `ActorId`
//! - [`collision`] - Ray-AABB tests and the `CollisionWorld` trace contract
//! - [`world`] - Box world implementing `CollisionWorld` and owning interactables
//! - [`body`] - `CharacterBody` solver contract and the `KinematicBody` solver

pub mod body;
pub mod collision;
pub mod types;
pub mod world;

pub use body::{CharacterBody, KinematicBody, CAPSULE_HALF_HEIGHT, CROUCHED_HALF_HEIGHT};
pub use collision::{CollisionWorld, TraceHit, aabb_surface_normal, ray_aabb_intersect};
pub use types::{ActorId, UP, Vec3};
pub use world::{Blocker, World};
