//! Character Body
//!
//! [`CharacterBody`] is everything the player controller needs from the
//! character-movement solver: velocity, force accumulation, floor state,
//! the tunable friction/speed fields, impulse launches and the capsule.
//!
//! [`KinematicBody`] is a small solver implementing it on a flat ground
//! plane. It is what the sandbox binary and the tests drive.
//!
//! # Physics Model
//!
//! - Units are centimetres and seconds, Z is up
//! - Ground movement accelerates toward the input direction, capped at the
//!   current max speed (crouched max speed while the capsule is crouched)
//! - Without input, velocity brakes with
//!   `ground_friction * braking_friction_factor * v + braking_deceleration`
//! - Accumulated forces are divided by mass and cleared every step
//!
//! # Usage
//!
//! ```rust,ignore
//! use runner_engine::physics::{KinematicBody, ActorId};
//!
//! let mut body = KinematicBody::new(ActorId(1), Vec3::new(0.0, 0.0, 96.0));
//! // Each frame, after the controller ticked:
//! body.step(delta_time);
//! ```

use glam::Vec3;

use super::types::{ActorId, UP};

/// Default capsule half height in centimetres
pub const CAPSULE_HALF_HEIGHT: f32 = 96.0;

/// Default crouched capsule half height in centimetres
pub const CROUCHED_HALF_HEIGHT: f32 = 44.0;

/// Gravity acceleration in cm/s^2 (negative Z)
pub const GRAVITY: f32 = -980.0;

/// Input acceleration in cm/s^2
pub const MAX_ACCELERATION: f32 = 2048.0;

/// Jump launch speed in cm/s
pub const JUMP_Z_VELOCITY: f32 = 420.0;

/// Body mass in kg, divides accumulated forces
pub const MASS: f32 = 100.0;

/// Character-movement solver contract consumed by the player controller.
pub trait CharacterBody {
    /// Identity of the character actor, ignored by its own traces.
    fn id(&self) -> ActorId;

    /// Capsule center in world space.
    fn location(&self) -> Vec3;
    /// Facing direction (unit length).
    fn forward(&self) -> Vec3;
    /// Right-hand direction (unit length).
    fn right(&self) -> Vec3;
    /// Eye location and look direction used for interaction traces.
    fn view_point(&self) -> (Vec3, Vec3);

    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    /// Append a force to be integrated on the next solver step.
    fn add_force(&mut self, force: Vec3);
    /// Queue movement input along `direction` scaled by `scale`.
    fn add_movement_input(&mut self, direction: Vec3, scale: f32);
    /// Zero velocity and pending forces right away.
    fn stop_movement_immediately(&mut self);
    /// Instantaneous velocity change. The override flags replace the XY
    /// and Z velocity components instead of adding to them.
    fn launch(&mut self, velocity: Vec3, xy_override: bool, z_override: bool);

    fn is_falling(&self) -> bool;
    /// Normal of the floor the body stands on. `UP` while airborne.
    fn floor_normal(&self) -> Vec3;

    fn max_walk_speed(&self) -> f32;
    fn set_max_walk_speed(&mut self, speed: f32);
    fn max_walk_speed_crouched(&self) -> f32;
    fn set_max_walk_speed_crouched(&mut self, speed: f32);
    fn ground_friction(&self) -> f32;
    fn set_ground_friction(&mut self, friction: f32);
    fn braking_deceleration(&self) -> f32;
    fn set_braking_deceleration(&mut self, deceleration: f32);
    fn braking_friction_factor(&self) -> f32;
    fn set_braking_friction_factor(&mut self, factor: f32);

    /// Current (possibly crouched) capsule half height.
    fn capsule_half_height(&self) -> f32;
    fn is_crouched(&self) -> bool;
    fn crouch(&mut self);
    fn uncrouch(&mut self);

    fn add_yaw_input(&mut self, degrees: f32);
    fn add_pitch_input(&mut self, degrees: f32);
    fn jump(&mut self);
    fn stop_jumping(&mut self);
}

/// Flat-ground kinematic solver.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    id: ActorId,

    /// Capsule center in world space
    position: Vec3,

    /// Current velocity (cm/s)
    velocity: Vec3,

    /// Sum of forces added since the last step (N)
    pending_force: Vec3,

    /// Sum of movement input since the last step, not normalized
    pending_input: Vec3,

    /// Facing yaw in degrees, 0 = +X
    yaw: f32,

    /// Look pitch in degrees, clamped to +-89
    pitch: f32,

    /// Height of the ground plane under the body
    ground_height: f32,

    /// Normal reported for the floor while grounded
    floor_normal: Vec3,

    grounded: bool,
    jump_requested: bool,

    max_walk_speed: f32,
    max_walk_speed_crouched: f32,
    ground_friction: f32,
    braking_deceleration: f32,
    braking_friction_factor: f32,

    standing_half_height: f32,
    crouched_half_height: f32,
    crouched: bool,

    /// Eye offset above the capsule center
    eye_height: f32,
}

impl KinematicBody {
    /// Create a grounded body whose capsule center sits at `position`.
    ///
    /// The ground plane is placed under the capsule bottom.
    pub fn new(id: ActorId, position: Vec3) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::ZERO,
            pending_force: Vec3::ZERO,
            pending_input: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            ground_height: position.z - CAPSULE_HALF_HEIGHT,
            floor_normal: UP,
            grounded: true,
            jump_requested: false,
            max_walk_speed: 600.0,
            max_walk_speed_crouched: 300.0,
            ground_friction: 8.0,
            braking_deceleration: 2048.0,
            braking_friction_factor: 2.0,
            standing_half_height: CAPSULE_HALF_HEIGHT,
            crouched_half_height: CROUCHED_HALF_HEIGHT,
            crouched: false,
            eye_height: 64.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the capsule center.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw_degrees: f32) {
        self.yaw = yaw_degrees.rem_euclid(360.0);
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Force the grounded flag (e.g. to simulate walking off a ledge).
    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Tilt the floor the body stands on. Only affects the reported normal.
    pub fn set_floor_normal(&mut self, normal: Vec3) {
        self.floor_normal = normal.try_normalize().unwrap_or(UP);
    }

    pub fn set_ground_height(&mut self, height: f32) {
        self.ground_height = height;
    }

    /// Forces accumulated since the last step.
    pub fn pending_force(&self) -> Vec3 {
        self.pending_force
    }

    /// Movement input accumulated since the last step.
    pub fn pending_input(&self) -> Vec3 {
        self.pending_input
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, self.velocity.y, 0.0).length()
    }

    fn current_max_speed(&self) -> f32 {
        if self.crouched {
            self.max_walk_speed_crouched
        } else {
            self.max_walk_speed
        }
    }

    /// Advance the solver by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let dt = dt.clamp(0.0001, 0.1);

        if self.jump_requested && self.grounded {
            self.velocity.z = JUMP_Z_VELOCITY;
            self.grounded = false;
        }
        self.jump_requested = false;

        if self.grounded {
            self.apply_ground_movement(dt);
        } else {
            self.velocity.z += GRAVITY * dt;
        }

        self.velocity += self.pending_force / MASS * dt;
        self.pending_force = Vec3::ZERO;
        self.pending_input = Vec3::ZERO;

        self.position += self.velocity * dt;

        let bottom = self.position.z - self.capsule_half_height();
        if bottom <= self.ground_height && self.velocity.z <= 0.0 {
            self.position.z = self.ground_height + self.capsule_half_height();
            self.velocity.z = 0.0;
            self.grounded = true;
        } else if bottom > self.ground_height + 1.0 {
            self.grounded = false;
        }
    }

    fn apply_ground_movement(&mut self, dt: f32) {
        let mut horizontal = Vec3::new(self.velocity.x, self.velocity.y, 0.0);
        let input = Vec3::new(self.pending_input.x, self.pending_input.y, 0.0);
        let max_speed = self.current_max_speed();

        let has_input = input.length_squared() > 1e-6;
        let accel_dir = input.normalize_or_zero();
        let input_scale = input.length().min(1.0);
        let speed = horizontal.length();
        let over_max = speed > max_speed;

        if !has_input || over_max {
            let old = horizontal;
            horizontal = self.apply_braking(horizontal, dt);
            // Braking never pulls an accelerating body below its cap
            if over_max && has_input && horizontal.length() < max_speed && accel_dir.dot(old) > 0.0 {
                horizontal = old.normalize_or_zero() * max_speed;
            }
        } else {
            let friction_blend = (dt * self.ground_friction).min(1.0);
            horizontal -= (horizontal - accel_dir * speed) * friction_blend;
        }

        if has_input {
            let max_input_speed = horizontal.length().max(max_speed);
            horizontal += accel_dir * MAX_ACCELERATION * input_scale * dt;
            horizontal = horizontal.clamp_length_max(max_input_speed);
        }

        self.velocity.x = horizontal.x;
        self.velocity.y = horizontal.y;
    }

    fn apply_braking(&self, velocity: Vec3, dt: f32) -> Vec3 {
        let speed = velocity.length();
        if speed <= f32::EPSILON {
            return Vec3::ZERO;
        }
        let friction = self.ground_friction * self.braking_friction_factor;
        let decel = friction * speed + self.braking_deceleration;
        let new_speed = (speed - decel * dt).max(0.0);
        velocity * (new_speed / speed)
    }
}

impl CharacterBody for KinematicBody {
    fn id(&self) -> ActorId {
        self.id
    }

    fn location(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), yaw.sin(), 0.0)
    }

    fn right(&self) -> Vec3 {
        // Z-up, left-handed view: right is forward rotated -90 degrees
        let forward = self.forward();
        Vec3::new(forward.y, -forward.x, 0.0)
    }

    fn view_point(&self) -> (Vec3, Vec3) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let dir = Vec3::new(yaw.cos() * pitch.cos(), yaw.sin() * pitch.cos(), pitch.sin());
        (self.position + UP * self.eye_height, dir)
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn add_force(&mut self, force: Vec3) {
        self.pending_force += force;
    }

    fn add_movement_input(&mut self, direction: Vec3, scale: f32) {
        self.pending_input += direction * scale;
    }

    fn stop_movement_immediately(&mut self) {
        self.velocity = Vec3::ZERO;
        self.pending_force = Vec3::ZERO;
    }

    fn launch(&mut self, velocity: Vec3, xy_override: bool, z_override: bool) {
        let mut result = self.velocity;
        if xy_override {
            result.x = velocity.x;
            result.y = velocity.y;
        } else {
            result.x += velocity.x;
            result.y += velocity.y;
        }
        if z_override {
            result.z = velocity.z;
        } else {
            result.z += velocity.z;
        }
        self.velocity = result;
    }

    fn is_falling(&self) -> bool {
        !self.grounded
    }

    fn floor_normal(&self) -> Vec3 {
        if self.grounded { self.floor_normal } else { UP }
    }

    fn max_walk_speed(&self) -> f32 {
        self.max_walk_speed
    }

    fn set_max_walk_speed(&mut self, speed: f32) {
        self.max_walk_speed = speed;
    }

    fn max_walk_speed_crouched(&self) -> f32 {
        self.max_walk_speed_crouched
    }

    fn set_max_walk_speed_crouched(&mut self, speed: f32) {
        self.max_walk_speed_crouched = speed;
    }

    fn ground_friction(&self) -> f32 {
        self.ground_friction
    }

    fn set_ground_friction(&mut self, friction: f32) {
        self.ground_friction = friction;
    }

    fn braking_deceleration(&self) -> f32 {
        self.braking_deceleration
    }

    fn set_braking_deceleration(&mut self, deceleration: f32) {
        self.braking_deceleration = deceleration;
    }

    fn braking_friction_factor(&self) -> f32 {
        self.braking_friction_factor
    }

    fn set_braking_friction_factor(&mut self, factor: f32) {
        self.braking_friction_factor = factor;
    }

    fn capsule_half_height(&self) -> f32 {
        if self.crouched {
            self.crouched_half_height
        } else {
            self.standing_half_height
        }
    }

    fn is_crouched(&self) -> bool {
        self.crouched
    }

    fn crouch(&mut self) {
        if !self.crouched {
            // Keep the capsule bottom where it is
            self.position.z -= self.standing_half_height - self.crouched_half_height;
            self.crouched = true;
        }
    }

    fn uncrouch(&mut self) {
        if self.crouched {
            self.position.z += self.standing_half_height - self.crouched_half_height;
            self.crouched = false;
        }
    }

    fn add_yaw_input(&mut self, degrees: f32) {
        self.set_yaw(self.yaw + degrees);
    }

    fn add_pitch_input(&mut self, degrees: f32) {
        self.pitch = (self.pitch + degrees).clamp(-89.0, 89.0);
    }

    fn jump(&mut self) {
        self.jump_requested = true;
    }

    fn stop_jumping(&mut self) {
        self.jump_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.01;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn body() -> KinematicBody {
        KinematicBody::new(ActorId(1), Vec3::new(0.0, 0.0, CAPSULE_HALF_HEIGHT))
    }

    #[test]
    fn test_new_body_is_grounded_on_flat_floor() {
        let body = body();
        assert!(!body.is_falling());
        assert_eq!(body.floor_normal(), UP);
        assert!(approx_eq(body.capsule_half_height(), CAPSULE_HALF_HEIGHT));
    }

    #[test]
    fn test_forward_and_right() {
        let mut body = body();
        assert!(body.forward().abs_diff_eq(Vec3::X, 1e-5));
        assert!(body.right().abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-5));

        body.set_yaw(90.0);
        assert!(body.forward().abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_input_caps_at_max_walk_speed() {
        let mut body = body();
        for _ in 0..200 {
            body.add_movement_input(Vec3::X, 1.0);
            body.step(0.016);
        }
        assert!(approx_eq(body.horizontal_speed(), 600.0));
    }

    #[test]
    fn test_crouched_speed_cap() {
        let mut body = body();
        body.crouch();
        for _ in 0..200 {
            body.add_movement_input(Vec3::X, 1.0);
            body.step(0.016);
        }
        assert!(approx_eq(body.horizontal_speed(), 300.0));
    }

    #[test]
    fn test_braking_stops_body() {
        let mut body = body();
        body.set_velocity(Vec3::new(600.0, 0.0, 0.0));
        for _ in 0..60 {
            body.step(0.016);
        }
        assert!(approx_eq(body.speed(), 0.0));
    }

    #[test]
    fn test_zero_friction_keeps_momentum_longer() {
        let mut slippery = body();
        slippery.set_ground_friction(0.0);
        slippery.set_braking_deceleration(1024.0);
        slippery.set_velocity(Vec3::new(1200.0, 0.0, 0.0));

        let mut grippy = body();
        grippy.set_velocity(Vec3::new(1200.0, 0.0, 0.0));

        for _ in 0..10 {
            slippery.step(0.016);
            grippy.step(0.016);
        }
        assert!(slippery.speed() > grippy.speed());
    }

    #[test]
    fn test_force_is_divided_by_mass_and_cleared() {
        let mut body = body();
        body.set_ground_friction(0.0);
        body.set_braking_deceleration(0.0);
        body.add_force(Vec3::new(MASS * 100.0, 0.0, 0.0));
        body.step(0.1);
        assert!(approx_eq(body.velocity().x, 10.0));
        assert_eq!(body.pending_force(), Vec3::ZERO);
    }

    #[test]
    fn test_launch_overrides() {
        let mut body = body();
        body.set_velocity(Vec3::new(100.0, 100.0, 50.0));

        body.launch(Vec3::new(6000.0, 0.0, 0.0), true, true);
        assert_eq!(body.velocity(), Vec3::new(6000.0, 0.0, 0.0));

        body.launch(Vec3::new(10.0, 0.0, 5.0), false, false);
        assert_eq!(body.velocity(), Vec3::new(6010.0, 0.0, 5.0));
    }

    #[test]
    fn test_jump_and_land() {
        let mut body = body();
        body.jump();
        body.step(0.016);
        assert!(body.is_falling());

        for _ in 0..200 {
            body.step(0.016);
            if !body.is_falling() {
                break;
            }
        }
        assert!(!body.is_falling());
        assert!(approx_eq(body.position().z, CAPSULE_HALF_HEIGHT));
    }

    #[test]
    fn test_walks_off_ledge_and_lands_lower() {
        let mut body = body();
        body.set_ground_height(-200.0);
        body.step(0.016);
        assert!(body.is_falling());

        for _ in 0..200 {
            body.step(0.016);
            if !body.is_falling() {
                break;
            }
        }
        assert!(!body.is_falling());
        assert!(approx_eq(body.position().z, -200.0 + CAPSULE_HALF_HEIGHT));
    }

    #[test]
    fn test_crouch_keeps_feet_planted() {
        let mut body = body();
        let feet = body.location().z - body.capsule_half_height();
        body.crouch();
        assert!(approx_eq(body.location().z - body.capsule_half_height(), feet));
        body.uncrouch();
        assert!(approx_eq(body.location().z - body.capsule_half_height(), feet));
    }

    #[test]
    fn test_airborne_floor_normal_is_up() {
        let mut body = body();
        body.set_floor_normal(Vec3::new(0.3, 0.0, 1.0));
        assert_ne!(body.floor_normal(), UP);
        body.set_grounded(false);
        assert_eq!(body.floor_normal(), UP);
    }
}
