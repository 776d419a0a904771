//! Ability Timers
//!
//! One-shot delayed actions advanced by the host loop's tick. Each ability
//! owns its own [`AbilityTimer`]; arming it again replaces whatever was
//! pending, which is how a dash's execution window hands over to its
//! cooldown and how a re-pressed interact restarts its hold timer.
//!
//! Instead of storing a closure, the timer stores a small action value that
//! its owner dispatches when [`AbilityTimer::tick`] reports it fired. That
//! keeps the callback on the owner's `&mut self` path, which is the same
//! single-threaded update the rest of the controller runs on.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[derive(Clone, Copy)]
//! enum DashAction {
//!     Stop,
//!     Reset,
//! }
//!
//! let mut timer = AbilityTimer::new();
//! timer.arm(0.1, DashAction::Stop);
//!
//! // Each frame:
//! if let Some(action) = timer.tick(delta_time) {
//!     handle(action);
//! }
//! ```

/// A cancellable, replaceable one-shot timer carrying an action tag.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityTimer<A> {
    pending: Option<Pending<A>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Pending<A> {
    action: A,
    duration: f32,
    remaining: f32,
}

impl<A> Default for AbilityTimer<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A: Copy> AbilityTimer<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire after `duration` seconds.
    ///
    /// Any action already pending on this timer is dropped without firing.
    /// A non-positive duration fires on the next tick.
    pub fn arm(&mut self, duration: f32, action: A) {
        let duration = duration.max(0.0);
        self.pending = Some(Pending {
            action,
            duration,
            remaining: duration,
        });
    }

    /// Drop the pending action, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The action that will fire next.
    pub fn pending_action(&self) -> Option<A> {
        self.pending.as_ref().map(|p| p.action)
    }

    /// Seconds left before the pending action fires, 0 when idle.
    pub fn remaining(&self) -> f32 {
        self.pending.as_ref().map_or(0.0, |p| p.remaining)
    }

    /// Duration the pending action was armed with, 0 when idle.
    pub fn duration(&self) -> f32 {
        self.pending.as_ref().map_or(0.0, |p| p.duration)
    }

    /// Advance by `dt` seconds. Returns the action once, on the tick where
    /// its time runs out; the timer is idle afterwards.
    pub fn tick(&mut self, dt: f32) -> Option<A> {
        let pending = self.pending.as_mut()?;
        pending.remaining -= dt.max(0.0);
        if pending.remaining <= 0.0 {
            self.pending.take().map(|p| p.action)
        } else {
            None
        }
    }
}
