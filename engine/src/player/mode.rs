//! Movement Modes
//!
//! The single active locomotion mode plus the held-input intents that the
//! controller reconciles into it.
//!
//! # Modes
//!
//! - Walking: initial mode, speed capped at walk speed
//! - Sprinting: speed capped at sprint speed
//! - Crouching: crouched capsule, speed capped at crouch speed
//! - Sliding: crouched capsule with sliding friction, entered only from Sprinting

use std::fmt;

use serde::{Deserialize, Serialize};

/// Player locomotion mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    Walking,
    Sprinting,
    Crouching,
    Sliding,
}

impl MovementMode {
    /// Whether the mode uses the crouched capsule.
    pub fn is_low(&self) -> bool {
        matches!(self, MovementMode::Crouching | MovementMode::Sliding)
    }
}

impl fmt::Display for MovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MovementMode::Walking => "walking",
            MovementMode::Sprinting => "sprinting",
            MovementMode::Crouching => "crouching",
            MovementMode::Sliding => "sliding",
        };
        f.write_str(name)
    }
}

/// Held inputs, independent of the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerIntent {
    pub sprint: bool,
    pub crouch: bool,
    pub dash: bool,
}

/// Pick the mode the current conditions call for.
///
/// Precedence: blocked or crouch held => Crouching, then not sprint
/// eligible => Walking, otherwise Sprinting. Never yields Sliding; slides
/// only start from an explicit crouch while sprinting.
pub fn resolve_mode(can_stand: bool, can_sprint: bool, wants_crouch: bool) -> MovementMode {
    if !can_stand || wants_crouch {
        MovementMode::Crouching
    } else if !can_sprint {
        MovementMode::Walking
    } else {
        MovementMode::Sprinting
    }
}
