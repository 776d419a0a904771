//! Runner Engine Library
//!
//! First/third-person player controller for an action game: a locomotion
//! state machine (walking, sprinting, crouching, sliding), a cooldown-gated
//! dash, vault-on-jump, line-trace interaction with world objects and item
//! pickup glue.
//!
//! # Modules
//!
//! - [`player`] - The controller state machine, dash, tuning and events
//! - [`physics`] - Character body and collision world the controller drives
//! - [`interaction`] - Interactable contract and the focus scanner
//! - [`inventory`] - Items, inventories and world pickups
//! - [`input`] - Key bindings turned into controller inputs
//! - [`timer`] - One-shot ability timers
//! - [`config`] - JSON-loadable controller configuration
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Example
//!
//! ```ignore
//! use runner_engine::{ControllerConfig, KinematicBody, PlayerController, World};
//! use runner_engine::physics::{ActorId, Vec3};
//!
//! runner_engine::logging::init("info");
//!
//! let mut world = World::new();
//! let mut controller = PlayerController::new(ControllerConfig::default());
//! controller.possess(KinematicBody::new(world.spawn_actor(), Vec3::new(0.0, 0.0, 96.0)));
//!
//! let dt = 1.0 / 60.0;
//! controller.tick(dt, &world);
//! if let Some(body) = controller.character_mut() {
//!     body.step(dt);
//! }
//! ```

pub mod config;
pub mod input;
pub mod interaction;
pub mod inventory;
pub mod logging;
pub mod physics;
pub mod player;
pub mod timer;

// Re-export the types a host needs to wire up a controller
pub use config::{ConfigError, ControllerConfig};
pub use input::{ControllerInput, InputState, KeyCode};
pub use physics::{CharacterBody, KinematicBody, World};
pub use player::{ControllerEvent, MovementMode, PlayerController};
