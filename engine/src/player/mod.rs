//! Player Module
//!
//! Player controller and the pieces it is built from.
//!
//! # Components
//!
//! - [`PlayerController`] - Locomotion state machine driving a possessed character
//!   - Walking / Sprinting / Crouching / Sliding with one transition point
//!   - Dash with execution window and cooldown, vault-on-jump
//!   - Interaction scanning and camera turn rates
//! - [`MovementTuning`] - Speeds, friction and dash parameters
//! - [`DashState`] - Dash cycle on top of an ability timer
//! - [`EventBus`] - Listeners for [`ControllerEvent`]s
//! - [`probe`] - Stand-up clearance and floor slope queries

pub mod controller;
pub mod dash;
pub mod events;
pub mod mode;
pub mod probe;
pub mod tuning;
pub mod vault;

pub use controller::{Perspective, PlayerController};
pub use dash::{DashPhase, DashState, DashTransition};
pub use events::{ControllerEvent, EventBus, ListenerId};
pub use mode::{ControllerIntent, MovementMode, resolve_mode};
pub use tuning::MovementTuning;
pub use vault::VaultCapability;
