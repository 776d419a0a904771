//! Keyboard Input Module
//!
//! Tracks which keys are held. Decoupled from any windowing system so the
//! host maps its own key events onto [`KeyCode`].

use std::collections::HashSet;

/// Generic key codes, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,
    Q,
    E,
    Space,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Letter keys (for various bindings)
    C,
    F,
    R,
    V,

    Escape,
    Enter,
    Tab,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Set of currently held keys.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Create a new keyboard state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release.
    ///
    /// Returns `true` if the key changed state. OS key repeat (press while
    /// already held) returns `false`.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if key == KeyCode::Unknown {
            return false;
        }
        if pressed {
            self.held.insert(key)
        } else {
            self.held.remove(&key)
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn held(&self) -> &HashSet<KeyCode> {
        &self.held
    }

    pub fn any_held(&self) -> bool {
        !self.held.is_empty()
    }

    /// Release every key.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}
