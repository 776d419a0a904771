//! Input Module
//!
//! Platform-agnostic input handling. The host window feeds key events into
//! [`InputState`], which turns them into [`ControllerInput`] values for the
//! player controller: button edges immediately, analog axes once per frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use runner_engine::input::{InputState, KeyCode};
//!
//! let mut input = InputState::new();
//!
//! // Window event
//! if let Some(event) = input.handle_key(KeyCode::ShiftLeft, true) {
//!     controller.handle_input(event, &world);
//! }
//!
//! // Once per frame, before ticking the controller
//! for event in input.axis_inputs() {
//!     controller.handle_input(event, &world);
//! }
//! ```

pub mod bindings;
pub mod keyboard;

pub use bindings::{InputAction, KeyBindings};
pub use keyboard::{KeyCode, KeyboardState};

/// Analog inputs the controller consumes, each in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    MoveForward,
    MoveRight,
    /// Yaw rate, scaled by the base turn rate
    TurnRate,
    /// Pitch rate, scaled by the base look-up rate
    LookUpRate,
}

/// Button inputs the controller consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    Crouch,
    Sprint,
    Dash,
    Interact,
    SwitchPerspective,
}

/// One input delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerInput {
    Axis(Axis, f32),
    Pressed(Action),
    Released(Action),
}

impl InputAction {
    /// The controller button this action drives, `None` for axis actions.
    pub fn button(self) -> Option<Action> {
        match self {
            InputAction::Sprint => Some(Action::Sprint),
            InputAction::Jump => Some(Action::Jump),
            InputAction::Crouch => Some(Action::Crouch),
            InputAction::Dash => Some(Action::Dash),
            InputAction::Interact => Some(Action::Interact),
            InputAction::SwitchPerspective => Some(Action::SwitchPerspective),
            _ => None,
        }
    }
}

/// Keyboard state plus bindings, producing controller inputs.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub bindings: KeyBindings,
}

impl InputState {
    /// Create a new input state with default bindings and nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            keyboard: KeyboardState::new(),
            bindings,
        }
    }

    /// Record a key event. Returns the button edge it produced, if any.
    ///
    /// Key repeat and keys bound to axes produce nothing here; axes are
    /// read with [`InputState::axis_inputs`].
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> Option<ControllerInput> {
        if !self.keyboard.handle_key(key, pressed) {
            return None;
        }

        let action = self.bindings.get_action(key)?.button()?;
        Some(if pressed {
            ControllerInput::Pressed(action)
        } else {
            ControllerInput::Released(action)
        })
    }

    /// Current value of every axis.
    pub fn axis_inputs(&self) -> [ControllerInput; 4] {
        let held = self.keyboard.held();
        let axes = [Axis::MoveForward, Axis::MoveRight, Axis::TurnRate, Axis::LookUpRate];

        let mut inputs = [ControllerInput::Axis(Axis::MoveForward, 0.0); 4];
        for ((input, axis), (positive, negative)) in inputs.iter_mut().zip(axes).zip(InputAction::AXIS_PAIRS) {
            *input = ControllerInput::Axis(axis, self.bindings.axis_value(positive, negative, held));
        }
        inputs
    }

    /// Release every key. Returns the release edges for buttons that were held,
    /// so the controller does not stay sprinting or crouching after focus loss.
    pub fn reset(&mut self) -> Vec<ControllerInput> {
        let released = self
            .keyboard
            .held()
            .iter()
            .filter_map(|&key| self.bindings.get_action(key))
            .filter_map(InputAction::button)
            .map(ControllerInput::Released)
            .collect();
        self.keyboard.reset();
        released
    }
}
