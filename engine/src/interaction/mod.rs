//! Interaction Module
//!
//! Line-of-sight interaction with world objects.
//!
//! # Components
//!
//! - [`Interactable`] - Capability a world actor exposes to be focused and used
//! - [`InteractableSource`] - Lookup from a traced actor to its interactable
//! - [`InteractionScanner`] - Periodic forward trace tracking the focused
//!   interactable and sequencing focus / interact callbacks
//! - [`InteractionConfig`] - Scan interval and trace length

pub mod scanner;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::physics::ActorId;

pub use scanner::{InteractionScanner, ScanOutcome};

/// Interaction times at or below this fire immediately on press.
pub const INSTANT_INTERACTION_TIME: f32 = 1e-4;

/// Capability exposed by world actors that the player can look at and use.
///
/// Every callback receives the interacting character.
pub trait Interactable {
    /// The player started looking at this object.
    fn begin_focus(&mut self, character: ActorId);
    /// The player stopped looking at this object.
    fn end_focus(&mut self, character: ActorId);
    /// The interact input was pressed while focused.
    fn begin_interact(&mut self, character: ActorId);
    /// The interaction completed (immediately, or after `interaction_time`).
    fn interact(&mut self, character: ActorId);
    /// The interact input was released, or focus was lost while held.
    fn end_interact(&mut self, character: ActorId);

    /// Maximum distance from the viewpoint this object can be focused at.
    fn interaction_distance(&self) -> f32;
    /// Seconds the input must be held before `interact` fires.
    fn interaction_time(&self) -> f32;
}

/// Shared handle to an interactable owned by the world.
pub type SharedInteractable = Rc<RefCell<dyn Interactable>>;

/// Resolves traced actors to the interactable they expose, if any.
pub trait InteractableSource {
    fn interactable(&self, actor: ActorId) -> Option<SharedInteractable>;
}

/// Configuration for the interaction scanner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Seconds between scans. Zero scans every tick.
    pub check_interval: f32,
    /// Length of the forward trace from the viewpoint.
    pub trace_distance: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            check_interval: 0.0,
            trace_distance: 1000.0,
        }
    }
}
