//! Dash Ability
//!
//! A dash is a single flat impulse along the facing direction followed by
//! a cooldown:
//!
//! 1. Ready: a dash may start (not crouching, no dash outstanding)
//! 2. Executing: impulse applied, braking friction lowered, lasts `dash_exec_time`
//! 3. Cooling down: velocity zeroed, walking braking restored, lasts `dash_cooldown`
//!
//! Only one cycle can be outstanding; the flag stays set until the
//! cooldown timer clears it.

use glam::Vec3;

use super::tuning::MovementTuning;
use crate::physics::CharacterBody;
use crate::timer::AbilityTimer;

/// Visible phase of the dash cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashPhase {
    Ready,
    Executing,
    CoolingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashAction {
    Stop,
    Reset,
}

/// What a dash tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashTransition {
    /// The execution window ended; the dash was stopped.
    Stopped,
    /// The cooldown ran out; a new dash may start.
    Ready,
}

#[derive(Debug, Clone, Default)]
pub struct DashState {
    active: bool,
    timer: AbilityTimer<DashAction>,
}

impl DashState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a dash cycle is outstanding (executing or cooling down).
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> DashPhase {
        match (self.active, self.timer.pending_action()) {
            (true, Some(DashAction::Stop)) => DashPhase::Executing,
            (true, _) => DashPhase::CoolingDown,
            (false, _) => DashPhase::Ready,
        }
    }

    /// Seconds until the current phase ends, 0 when ready.
    pub fn remaining(&self) -> f32 {
        self.timer.remaining()
    }

    pub fn can_dash(&self, crouching: bool) -> bool {
        !crouching && !self.active
    }

    /// Start a dash if allowed. Returns `false` without touching anything
    /// when the dash is not allowed.
    pub fn start<B>(&mut self, body: &mut B, tuning: &MovementTuning, crouching: bool) -> bool
    where
        B: CharacterBody + ?Sized,
    {
        if !self.can_dash(crouching) {
            return false;
        }

        self.active = true;
        body.set_braking_friction_factor(tuning.dash_braking_friction_factor);

        let forward = body.forward();
        let direction = Vec3::new(forward.x, forward.y, 0.0).normalize_or_zero();
        body.launch(direction * tuning.dash_distance, true, true);

        self.timer.arm(tuning.dash_exec_time, DashAction::Stop);
        true
    }

    /// End the execution window: kill the residual velocity, restore
    /// walking braking and start the cooldown.
    pub fn stop<B>(&mut self, body: &mut B, tuning: &MovementTuning)
    where
        B: CharacterBody + ?Sized,
    {
        body.stop_movement_immediately();
        body.set_braking_friction_factor(tuning.walking_braking_friction_factor);
        self.timer.arm(tuning.dash_cooldown, DashAction::Reset);
    }

    /// Advance the dash timer. Stopping happens here when the execution
    /// window runs out.
    pub fn tick<B>(&mut self, dt: f32, body: &mut B, tuning: &MovementTuning) -> Option<DashTransition>
    where
        B: CharacterBody + ?Sized,
    {
        match self.timer.tick(dt)? {
            DashAction::Stop => {
                self.stop(body, tuning);
                Some(DashTransition::Stopped)
            }
            DashAction::Reset => {
                self.active = false;
                Some(DashTransition::Ready)
            }
        }
    }

    /// Drop any outstanding cycle without touching a body.
    pub fn reset(&mut self) {
        self.active = false;
        self.timer.cancel();
    }
}
