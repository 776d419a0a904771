//! Input Bindings Module
//!
//! Maps physical keys to logical controller actions so keys can be remapped
//! without touching the controller.

use std::collections::{HashMap, HashSet};

use super::KeyCode;

/// Logical inputs a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move forward (default: W)
    MoveForward,
    /// Move backward (default: S)
    MoveBack,
    /// Strafe left (default: A)
    MoveLeft,
    /// Strafe right (default: D)
    MoveRight,
    /// Turn at the base turn rate (default: arrow left / right)
    TurnLeft,
    TurnRight,
    /// Look up / down at the base look-up rate (default: arrow up / down)
    LookUp,
    LookDown,
    /// Sprint, held (default: Shift)
    Sprint,
    /// Jump or vault (default: Space)
    Jump,
    /// Crouch, held (default: Ctrl)
    Crouch,
    /// Dash (default: Q)
    Dash,
    /// Interact with the focused object, held for timed interactions (default: E)
    Interact,
    /// Toggle first / third person (default: V)
    SwitchPerspective,
}

impl InputAction {
    /// Pairs of actions that combine into one analog axis, positive first.
    pub const AXIS_PAIRS: [(InputAction, InputAction); 4] = [
        (InputAction::MoveForward, InputAction::MoveBack),
        (InputAction::MoveRight, InputAction::MoveLeft),
        (InputAction::TurnRight, InputAction::TurnLeft),
        (InputAction::LookUp, InputAction::LookDown),
    ];

    /// Whether this action feeds an analog axis rather than a button.
    pub fn is_axis(self) -> bool {
        Self::AXIS_PAIRS
            .iter()
            .any(|&(positive, negative)| self == positive || self == negative)
    }
}

/// Maps physical keys to logical actions, one key per action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, InputAction>,
    /// Reverse lookup, for display and held-state queries
    action_to_key: HashMap<InputAction, KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Default bindings:
    /// - W / S / A / D = move
    /// - Arrow keys = turn and look
    /// - Shift (Left) = Sprint
    /// - Space = Jump
    /// - Ctrl (Left) = Crouch
    /// - Q = Dash
    /// - E = Interact
    /// - V = SwitchPerspective
    pub fn new() -> Self {
        let mut bindings = Self::empty();

        bindings.bind(KeyCode::W, InputAction::MoveForward);
        bindings.bind(KeyCode::S, InputAction::MoveBack);
        bindings.bind(KeyCode::A, InputAction::MoveLeft);
        bindings.bind(KeyCode::D, InputAction::MoveRight);
        bindings.bind(KeyCode::ArrowLeft, InputAction::TurnLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::TurnRight);
        bindings.bind(KeyCode::ArrowUp, InputAction::LookUp);
        bindings.bind(KeyCode::ArrowDown, InputAction::LookDown);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Sprint);
        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::ControlLeft, InputAction::Crouch);
        bindings.bind(KeyCode::Q, InputAction::Dash);
        bindings.bind(KeyCode::E, InputAction::Interact);
        bindings.bind(KeyCode::V, InputAction::SwitchPerspective);

        bindings
    }

    /// No bindings at all.
    pub fn empty() -> Self {
        Self {
            key_to_action: HashMap::new(),
            action_to_key: HashMap::new(),
        }
    }

    /// Bind a physical key to a logical action.
    ///
    /// Any previous binding of either the key or the action is removed.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.unbind_key(key);
        self.unbind_action(action);

        self.key_to_action.insert(key, action);
        self.action_to_key.insert(action, key);
    }

    pub fn unbind_key(&mut self, key: KeyCode) {
        if let Some(action) = self.key_to_action.remove(&key) {
            self.action_to_key.remove(&action);
        }
    }

    pub fn unbind_action(&mut self, action: InputAction) {
        if let Some(key) = self.action_to_key.remove(&action) {
            self.key_to_action.remove(&key);
        }
    }

    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_to_action.get(&key).copied()
    }

    pub fn get_key(&self, action: InputAction) -> Option<KeyCode> {
        self.action_to_key.get(&action).copied()
    }

    /// Whether the key bound to `action` is in `held`.
    pub fn is_action_held(&self, action: InputAction, held: &HashSet<KeyCode>) -> bool {
        self.action_to_key
            .get(&action)
            .is_some_and(|key| held.contains(key))
    }

    /// Combined value of an axis pair: 1, -1, or 0 when neither or both are held.
    pub fn axis_value(&self, positive: InputAction, negative: InputAction, held: &HashSet<KeyCode>) -> f32 {
        let positive = self.is_action_held(positive, held) as i32;
        let negative = self.is_action_held(negative, held) as i32;
        (positive - negative) as f32
    }
}
