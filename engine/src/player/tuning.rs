//! Movement Tuning
//!
//! Session-constant movement parameters. Only the walk speed is tuned
//! directly; crouch, sprint and slide speeds derive from it:
//!
//! - Crouch speed: walk / 2
//! - Sprint speed: walk x 2
//! - Slide speed: sprint x 2
//!
//! Friction and braking values come in walking/sliding pairs; the state
//! machine swaps between them when a slide starts and ends.

use serde::{Deserialize, Serialize};

/// Configuration for the player controller's locomotion modes and dash.
///
/// Loaded once when the controller is created and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Base walking speed in cm/s.
    pub walk_speed: f32,

    /// Ground friction while walking, sprinting or crouching.
    /// Higher friction means more force is needed to keep moving.
    pub walking_ground_friction: f32,

    /// Braking deceleration while walking, in cm/s^2.
    pub walking_braking_deceleration: f32,

    /// Braking friction factor outside of a dash.
    /// Higher factor means a more abrupt stop.
    pub walking_braking_friction_factor: f32,

    /// Ground friction while sliding. Zero lets the slide coast.
    pub sliding_ground_friction: f32,

    /// Braking deceleration while sliding, in cm/s^2.
    pub sliding_braking_deceleration: f32,

    /// Scale of the down-slope force applied every tick of a slide.
    /// Larger values gain more speed on slopes.
    pub slide_force_multiplier: f32,

    /// Launch speed of a dash, in cm/s.
    pub dash_distance: f32,

    /// Seconds after a dash ends before the next one is allowed.
    pub dash_cooldown: f32,

    /// Seconds the dash impulse is allowed to carry the character.
    pub dash_exec_time: f32,

    /// Braking friction factor during the dash window.
    pub dash_braking_friction_factor: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            walk_speed: 600.0,
            walking_ground_friction: 8.0,
            walking_braking_deceleration: 2048.0,
            walking_braking_friction_factor: 2.0,
            sliding_ground_friction: 0.0,
            sliding_braking_deceleration: 1024.0,
            slide_force_multiplier: 150_000.0,
            dash_distance: 6000.0,
            dash_cooldown: 1.0,
            dash_exec_time: 0.1,
            dash_braking_friction_factor: 0.0,
        }
    }
}

impl MovementTuning {
    /// Tuning with a custom walk speed and default everything else.
    pub fn with_walk_speed(walk_speed: f32) -> Self {
        Self {
            walk_speed,
            ..Default::default()
        }
    }

    #[inline]
    pub fn crouch_speed(&self) -> f32 {
        self.walk_speed / 2.0
    }

    #[inline]
    pub fn sprint_speed(&self) -> f32 {
        self.walk_speed * 2.0
    }

    #[inline]
    pub fn slide_speed(&self) -> f32 {
        self.sprint_speed() * 2.0
    }

    /// Check that every value is usable.
    ///
    /// Returns the name of the first offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.walk_speed.is_finite() && self.walk_speed > 0.0) {
            return Err("walk_speed");
        }
        let non_negative = [
            (self.walking_ground_friction, "walking_ground_friction"),
            (self.walking_braking_deceleration, "walking_braking_deceleration"),
            (self.walking_braking_friction_factor, "walking_braking_friction_factor"),
            (self.sliding_ground_friction, "sliding_ground_friction"),
            (self.sliding_braking_deceleration, "sliding_braking_deceleration"),
            (self.slide_force_multiplier, "slide_force_multiplier"),
            (self.dash_distance, "dash_distance"),
            (self.dash_cooldown, "dash_cooldown"),
            (self.dash_exec_time, "dash_exec_time"),
            (self.dash_braking_friction_factor, "dash_braking_friction_factor"),
        ];
        for (value, name) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(name);
            }
        }
        Ok(())
    }
}
