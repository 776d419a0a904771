//! Vaulting hook
//!
//! The controller does not vault by itself. It asks an injected
//! capability whether a vault is possible when jump is pressed and
//! triggers it if so.

/// Ledge-vaulting capability attached to the controlled character.
pub trait VaultCapability {
    fn can_vault(&self) -> bool;
    fn trigger_vault(&mut self);
}
