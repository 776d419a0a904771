//! Player Controller
//!
//! Drives a possessed [`CharacterBody`] from input: locomotion modes,
//! dash, vault-on-jump, interaction and camera turn rates.
//!
//! # Mode Transitions
//!
//! | From      | Trigger                                   | To                  |
//! |-----------|-------------------------------------------|---------------------|
//! | Walking   | sprint held and sprint eligible           | Sprinting           |
//! | Walking   | crouch pressed                            | Crouching           |
//! | Sprinting | crouch pressed                            | Sliding             |
//! | Sprinting | sprint released, airborne or blocked      | resolved            |
//! | Crouching | crouch released                           | resolved            |
//! | Crouching / Sliding | room to stand, crouch not held  | resolved every tick |
//! | Sliding   | slower than crouch speed, or stopped      | resolved            |
//!
//! Every transition goes through one place, which runs the slide cleanup
//! first when leaving Sliding and then applies the new mode's speed cap,
//! capsule and friction.
//!
//! # Usage
//!
//! ```rust,ignore
//! use runner_engine::player::PlayerController;
//!
//! let mut controller = PlayerController::new(config);
//! controller.possess(body);
//! controller.on_event(|event| println!("{event}"));
//!
//! // Input callbacks:
//! controller.handle_input(ControllerInput::Pressed(Action::Sprint), &world);
//!
//! // Each frame:
//! controller.tick(delta_time, &world);
//! if let Some(body) = controller.character_mut() {
//!     body.step(delta_time);
//! }
//! ```

use std::fmt;

use super::dash::{DashPhase, DashState, DashTransition};
use super::events::{ControllerEvent, EventBus, ListenerId};
use super::mode::{ControllerIntent, MovementMode, resolve_mode};
use super::probe;
use super::tuning::MovementTuning;
use super::vault::VaultCapability;
use crate::config::{CameraConfig, ControllerConfig};
use crate::input::{Action, Axis, ControllerInput};
use crate::interaction::{InteractableSource, InteractionScanner};
use crate::physics::{ActorId, CharacterBody, CollisionWorld};

/// Camera perspective the player is viewing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Perspective {
    FirstPerson,
    #[default]
    ThirdPerson,
}

impl Perspective {
    pub fn toggled(self) -> Self {
        match self {
            Perspective::FirstPerson => Perspective::ThirdPerson,
            Perspective::ThirdPerson => Perspective::FirstPerson,
        }
    }
}

/// Latest value of each analog input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisValues {
    forward: f32,
    right: f32,
    turn: f32,
    look_up: f32,
}

pub struct PlayerController<B: CharacterBody> {
    tuning: MovementTuning,
    camera: CameraConfig,

    /// Possessed character, `None` until `possess`
    character: Option<B>,

    vault: Option<Box<dyn VaultCapability>>,

    mode: MovementMode,
    intent: ControllerIntent,
    dash: DashState,
    scanner: InteractionScanner,
    events: EventBus,

    /// Capsule half height captured at possession, reference for stand-up checks
    standing_half_height: f32,

    perspective: Perspective,
    axes: AxisValues,
    transition_count: u64,
}

impl<B: CharacterBody + fmt::Debug> fmt::Debug for PlayerController<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerController")
            .field("character", &self.character)
            .field("mode", &self.mode)
            .field("intent", &self.intent)
            .field("dash", &self.dash.phase())
            .field("scanner", &self.scanner)
            .field("perspective", &self.perspective)
            .field("transition_count", &self.transition_count)
            .finish()
    }
}

impl<B: CharacterBody> Default for PlayerController<B> {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl<B: CharacterBody> PlayerController<B> {
    /// Create a controller with no character possessed yet.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            tuning: config.movement,
            camera: config.camera,
            character: None,
            vault: None,
            mode: MovementMode::Walking,
            intent: ControllerIntent::default(),
            dash: DashState::new(),
            scanner: InteractionScanner::new(config.interaction),
            events: EventBus::new(),
            standing_half_height: 0.0,
            perspective: Perspective::default(),
            axes: AxisValues::default(),
            transition_count: 0,
        }
    }

    /// Create a controller with custom movement tuning and default everything else.
    pub fn with_tuning(tuning: MovementTuning) -> Self {
        Self::new(ControllerConfig {
            movement: tuning,
            ..Default::default()
        })
    }

    // ------------------------------------------------------------------
    // Possession
    // ------------------------------------------------------------------

    /// Take control of `body`, returning the previously possessed one.
    ///
    /// Captures the standing capsule half height and writes the walking
    /// parameters into the body. Mode, intents and dash start fresh.
    pub fn possess(&mut self, mut body: B) -> Option<B> {
        let previous = self.unpossess();

        body.uncrouch();
        self.standing_half_height = body.capsule_half_height();
        body.set_max_walk_speed(self.tuning.walk_speed);
        body.set_max_walk_speed_crouched(self.tuning.crouch_speed());
        body.set_ground_friction(self.tuning.walking_ground_friction);
        body.set_braking_deceleration(self.tuning.walking_braking_deceleration);
        body.set_braking_friction_factor(self.tuning.walking_braking_friction_factor);

        tracing::debug!(character = ?body.id(), half_height = self.standing_half_height, "possessed");
        self.character = Some(body);
        previous
    }

    /// Release the possessed character.
    ///
    /// Focus and any held interaction end. A dash in its execution window is
    /// stopped and the mode transitions back to Walking, so the released body
    /// carries walking values and every start event has its stop.
    pub fn unpossess(&mut self) -> Option<B> {
        let character = self.character_id()?;
        self.scanner.clear_focus(character);

        if self.dash.phase() == DashPhase::Executing {
            if let Some(body) = self.character.as_mut() {
                self.dash.stop(body, &self.tuning);
            }
            self.emit(|character| ControllerEvent::DashStopped { character });
        }
        self.dash.reset();

        self.set_mode(MovementMode::Walking);
        self.intent = ControllerIntent::default();
        self.axes = AxisValues::default();

        tracing::debug!(%character, "unpossessed");
        self.character.take()
    }

    pub fn character(&self) -> Option<&B> {
        self.character.as_ref()
    }

    pub fn character_mut(&mut self) -> Option<&mut B> {
        self.character.as_mut()
    }

    /// Attach the character's vaulting capability.
    pub fn set_vault<V>(&mut self, vault: V)
    where
        V: VaultCapability + 'static,
    {
        self.vault = Some(Box::new(vault));
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn intent(&self) -> ControllerIntent {
        self.intent
    }

    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    pub fn standing_half_height(&self) -> f32 {
        self.standing_half_height
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_active()
    }

    pub fn dash_phase(&self) -> DashPhase {
        self.dash.phase()
    }

    /// Seconds until the current dash phase ends.
    pub fn dash_remaining(&self) -> f32 {
        self.dash.remaining()
    }

    pub fn scanner(&self) -> &InteractionScanner {
        &self.scanner
    }

    /// Number of mode transitions since creation.
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register an event listener.
    pub fn on_event<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ControllerEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    fn character_id(&self) -> Option<ActorId> {
        self.character.as_ref().map(|b| b.id())
    }

    fn emit<F>(&mut self, make: F)
    where
        F: FnOnce(ActorId) -> ControllerEvent,
    {
        if let Some(character) = self.character_id() {
            self.events.emit(make(character));
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Dispatch one input from the input layer.
    pub fn handle_input<W>(&mut self, input: ControllerInput, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        match input {
            ControllerInput::Axis(axis, value) => self.set_axis(axis, value),
            ControllerInput::Pressed(action) => match action {
                Action::Jump => self.start_jumping(),
                Action::Crouch => self.start_crouching(world),
                Action::Sprint => self.start_sprinting(world),
                Action::Dash => {
                    self.intent.dash = true;
                    self.start_dash();
                }
                Action::Interact => self.begin_interact(),
                Action::SwitchPerspective => self.switch_perspective(),
            },
            ControllerInput::Released(action) => match action {
                Action::Jump => self.stop_jumping(),
                Action::Crouch => self.stop_crouching(world),
                Action::Sprint => self.stop_sprinting(world),
                Action::Interact => self.end_interact(),
                Action::Dash => self.intent.dash = false,
                Action::SwitchPerspective => {}
            },
        }
    }

    /// Latch an analog input. Applied on the next tick.
    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        let value = if value.is_finite() { value } else { 0.0 };
        match axis {
            Axis::MoveForward => self.axes.forward = value,
            Axis::MoveRight => self.axes.right = value,
            Axis::TurnRate => self.axes.turn = value,
            Axis::LookUpRate => self.axes.look_up = value,
        }
    }

    fn apply_axes(&mut self, dt: f32) {
        let axes = self.axes;
        let camera = self.camera;
        let Some(body) = self.character.as_mut() else {
            return;
        };

        if axes.forward != 0.0 {
            let forward = body.forward();
            body.add_movement_input(forward, axes.forward);
        }
        if axes.right != 0.0 {
            let right = body.right();
            body.add_movement_input(right, axes.right);
        }
        if axes.turn != 0.0 {
            body.add_yaw_input(axes.turn * camera.base_turn_rate * dt);
        }
        if axes.look_up != 0.0 {
            body.add_pitch_input(axes.look_up * camera.base_look_up_rate * dt);
        }
    }

    pub fn switch_perspective(&mut self) {
        self.perspective = self.perspective.toggled();
        tracing::debug!(perspective = ?self.perspective, "perspective switched");
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Per-frame update: analog input, interaction scan, dash timers,
    /// mode recovery and the slide step, in that order.
    pub fn tick<W>(&mut self, dt: f32, world: &W)
    where
        W: CollisionWorld + InteractableSource + ?Sized,
    {
        self.apply_axes(dt);

        let Some((character, view)) = self.character.as_ref().map(|b| (b.id(), b.view_point())) else {
            return;
        };
        self.scanner.tick(dt, world, world, character, view);

        self.tick_dash(dt);
        self.recover_mode(world);

        if self.mode == MovementMode::Sliding {
            self.update_slide(world);
        }
    }

    fn tick_dash(&mut self, dt: f32) {
        let Some(body) = self.character.as_mut() else {
            return;
        };
        match self.dash.tick(dt, body, &self.tuning) {
            Some(DashTransition::Stopped) => {
                tracing::debug!("dash stopped, cooling down");
                self.emit(|character| ControllerEvent::DashStopped { character });
            }
            Some(DashTransition::Ready) => tracing::debug!("dash ready"),
            None => {}
        }
    }

    /// Re-resolve whenever a gating condition no longer matches the mode:
    /// clearance regained while low, or sprint eligibility flipped while upright.
    fn recover_mode<W>(&mut self, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        match self.mode {
            MovementMode::Crouching | MovementMode::Sliding => {
                if !self.intent.crouch && self.can_stand(world) {
                    self.resolve(world);
                }
            }
            MovementMode::Walking | MovementMode::Sprinting => {
                let sprinting = self.mode == MovementMode::Sprinting;
                if self.can_sprint(world) != sprinting {
                    self.resolve(world);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Environment queries
    // ------------------------------------------------------------------

    /// Room to stand up and crouch not held.
    pub fn can_stand<W>(&self, world: &W) -> bool
    where
        W: CollisionWorld + ?Sized,
    {
        match self.character.as_ref() {
            Some(body) => probe::can_stand(world, body, self.standing_half_height, self.intent.crouch),
            None => false,
        }
    }

    /// Sprint held, room to stand and on the ground.
    pub fn can_sprint<W>(&self, world: &W) -> bool
    where
        W: CollisionWorld + ?Sized,
    {
        if !self.intent.sprint {
            return false;
        }
        match self.character.as_ref() {
            Some(body) => !body.is_falling() && self.can_stand(world),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Sprinting
    // ------------------------------------------------------------------

    pub fn start_sprinting<W>(&mut self, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        self.set_sprinting(true, world);
    }

    pub fn stop_sprinting<W>(&mut self, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        self.set_sprinting(false, world);
    }

    fn set_sprinting<W>(&mut self, wants_sprint: bool, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        if wants_sprint == self.intent.sprint {
            return;
        }
        self.intent.sprint = wants_sprint;

        match self.mode {
            MovementMode::Sprinting if !wants_sprint => self.resolve(world),
            MovementMode::Walking | MovementMode::Crouching if wants_sprint => self.resolve(world),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Crouching
    // ------------------------------------------------------------------

    pub fn start_crouching<W>(&mut self, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        self.set_crouching(true, world);
    }

    pub fn stop_crouching<W>(&mut self, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        self.set_crouching(false, world);
    }

    fn set_crouching<W>(&mut self, wants_crouch: bool, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        if wants_crouch == self.intent.crouch {
            return;
        }
        self.intent.crouch = wants_crouch;

        match self.mode {
            MovementMode::Crouching if !wants_crouch => self.resolve(world),
            MovementMode::Walking if wants_crouch => self.set_mode(MovementMode::Crouching),
            MovementMode::Sprinting if wants_crouch => self.set_mode(MovementMode::Sliding),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Mode resolution
    // ------------------------------------------------------------------

    /// Re-derive the mode from the current blocking conditions and intents.
    ///
    /// Idempotent: with unchanged conditions, repeated calls change nothing.
    pub fn resolve<W>(&mut self, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        let mode = resolve_mode(self.can_stand(world), self.can_sprint(world), self.intent.crouch);
        self.set_mode(mode);
    }

    /// The only place the mode changes.
    fn set_mode(&mut self, new_mode: MovementMode) {
        if self.character.is_none() || new_mode == self.mode {
            return;
        }

        let previous = std::mem::replace(&mut self.mode, new_mode);
        self.transition_count += 1;
        tracing::debug!(from = %previous, to = %new_mode, "movement mode changed");
        self.on_mode_changed(previous);
    }

    /// Exit effects of `previous`, then entry effects of the current mode.
    /// The slide step itself runs from `tick`, once per frame.
    fn on_mode_changed(&mut self, previous: MovementMode) {
        match previous {
            MovementMode::Sliding => self.finish_slide(),
            MovementMode::Sprinting => self.emit(|character| ControllerEvent::SprintStopped { character }),
            _ => {}
        }

        let tuning = self.tuning;
        let mode = self.mode;
        let Some(body) = self.character.as_mut() else {
            return;
        };

        match mode {
            MovementMode::Sprinting => {
                body.set_max_walk_speed(tuning.sprint_speed());
                body.uncrouch();
            }
            MovementMode::Crouching => {
                body.set_max_walk_speed(tuning.crouch_speed());
                body.crouch();
            }
            MovementMode::Walking => {
                body.set_max_walk_speed(tuning.walk_speed);
                body.uncrouch();
            }
            MovementMode::Sliding => {
                body.crouch();
                let forward = body.forward();
                body.set_velocity(forward * tuning.sprint_speed());
                body.set_ground_friction(tuning.sliding_ground_friction);
                body.set_braking_deceleration(tuning.sliding_braking_deceleration);
            }
        }

        if matches!(mode, MovementMode::Walking | MovementMode::Sprinting) {
            self.intent.crouch = false;
        }

        self.emit(|character| ControllerEvent::ModeChanged {
            character,
            from: previous,
            to: mode,
        });

        match mode {
            MovementMode::Sprinting => self.emit(|character| ControllerEvent::SprintStarted { character }),
            MovementMode::Sliding => self.emit(|character| ControllerEvent::SlideStarted { character }),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Sliding
    // ------------------------------------------------------------------

    /// One slide step: push down-slope, cap at slide speed, end the slide
    /// once slower than crouch speed.
    fn update_slide<W>(&mut self, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        let tuning = self.tuning;
        let Some(body) = self.character.as_mut() else {
            return;
        };

        let slide_force = probe::floor_influence(body.floor_normal()) * tuning.slide_force_multiplier;
        body.add_force(slide_force);

        let velocity = body.velocity();
        let speed = velocity.length();
        let too_slow = if speed > tuning.slide_speed() {
            body.set_velocity(velocity.normalize_or_zero() * tuning.slide_speed());
            false
        } else {
            speed < tuning.crouch_speed()
        };

        if too_slow {
            self.stop_sliding(world);
        }
    }

    /// End the slide and re-resolve the mode.
    pub fn stop_sliding<W>(&mut self, world: &W)
    where
        W: CollisionWorld + ?Sized,
    {
        if self.mode == MovementMode::Sliding {
            self.resolve(world);
        }
    }

    /// Slide cleanup, run before the next mode's entry effects.
    fn finish_slide(&mut self) {
        let tuning = self.tuning;
        if let Some(body) = self.character.as_mut() {
            body.set_ground_friction(tuning.walking_ground_friction);
            body.set_braking_deceleration(tuning.walking_braking_deceleration);
        }
        self.emit(|character| ControllerEvent::SlideStopped { character });
    }

    // ------------------------------------------------------------------
    // Dash
    // ------------------------------------------------------------------

    /// Whether a dash could start right now.
    pub fn can_dash(&self) -> bool {
        self.character.is_some() && self.dash.can_dash(self.is_crouching())
    }

    fn is_crouching(&self) -> bool {
        self.intent.crouch || self.mode.is_low()
    }

    /// Start a dash. Silently ignored while crouching, already dashing or
    /// without a character. Returns whether the dash started.
    ///
    /// Holding the dash input does not repeat it; `intent().dash` only
    /// reports that the input is held.
    pub fn start_dash(&mut self) -> bool {
        let crouching = self.is_crouching();

        let started = match self.character.as_mut() {
            Some(body) => self.dash.start(body, &self.tuning, crouching),
            None => false,
        };

        if started {
            tracing::debug!(distance = self.tuning.dash_distance, "dash started");
            self.emit(|character| ControllerEvent::DashStarted { character });
        }
        started
    }

    // ------------------------------------------------------------------
    // Jump / vault
    // ------------------------------------------------------------------

    /// Jump, vaulting first if the vault capability allows it.
    pub fn start_jumping(&mut self) {
        if self.character.is_none() {
            return;
        }

        let vaulted = match self.vault.as_mut() {
            Some(vault) if vault.can_vault() => {
                vault.trigger_vault();
                true
            }
            _ => false,
        };
        if vaulted {
            tracing::debug!("vault triggered");
            self.emit(|character| ControllerEvent::VaultTriggered { character });
        }

        if let Some(body) = self.character.as_mut() {
            body.jump();
        }
    }

    pub fn stop_jumping(&mut self) {
        if let Some(body) = self.character.as_mut() {
            body.stop_jumping();
        }
    }

    // ------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------

    pub fn begin_interact(&mut self) {
        if let Some(character) = self.character_id() {
            tracing::debug!(focus = ?self.scanner.focused_actor(), "interact pressed");
            self.scanner.begin_interact(character);
        }
    }

    pub fn end_interact(&mut self) {
        if let Some(character) = self.character_id() {
            self.scanner.end_interact(character);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{KinematicBody, Vec3, World};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;
    const EPSILON: f32 = 0.01;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn setup() -> (World, PlayerController<KinematicBody>) {
        let mut world = World::new();
        let mut controller = PlayerController::default();
        controller.possess(KinematicBody::new(world.spawn_actor(), Vec3::new(0.0, 0.0, 96.0)));
        (world, controller)
    }

    fn record(controller: &mut PlayerController<KinematicBody>) -> Rc<RefCell<Vec<ControllerEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        controller.on_event(move |event| sink.borrow_mut().push(*event));
        log
    }

    fn body(controller: &PlayerController<KinematicBody>) -> &KinematicBody {
        controller.character().unwrap()
    }

    fn body_mut(controller: &mut PlayerController<KinematicBody>) -> &mut KinematicBody {
        controller.character_mut().unwrap()
    }

    struct TestVault {
        allowed: bool,
        triggered: Rc<Cell<u32>>,
    }

    impl VaultCapability for TestVault {
        fn can_vault(&self) -> bool {
            self.allowed
        }
        fn trigger_vault(&mut self) {
            self.triggered.set(self.triggered.get() + 1);
        }
    }

    #[test]
    fn test_possess_applies_walking_parameters() {
        let (_, controller) = setup();
        let body = body(&controller);

        assert_eq!(controller.mode(), MovementMode::Walking);
        assert!(approx_eq(controller.standing_half_height(), 96.0));
        assert!(approx_eq(body.max_walk_speed(), 600.0));
        assert!(approx_eq(body.max_walk_speed_crouched(), 300.0));
        assert!(approx_eq(body.ground_friction(), 8.0));
        assert!(approx_eq(body.braking_deceleration(), 2048.0));
        assert!(approx_eq(body.braking_friction_factor(), 2.0));
    }

    #[test]
    fn test_no_character_is_a_no_op() {
        let world = World::new();
        let mut controller: PlayerController<KinematicBody> = PlayerController::default();

        controller.start_sprinting(&world);
        controller.start_crouching(&world);
        controller.start_jumping();
        controller.begin_interact();
        controller.set_axis(Axis::TurnRate, 1.0);
        controller.tick(DT, &world);

        assert!(!controller.start_dash());
        assert_eq!(controller.mode(), MovementMode::Walking);
        assert_eq!(controller.transition_count(), 0);
    }

    #[test]
    fn test_sprint_sets_max_speed() {
        let (world, mut controller) = setup();
        let log = record(&mut controller);

        controller.start_sprinting(&world);

        assert_eq!(controller.mode(), MovementMode::Sprinting);
        assert!(approx_eq(body(&controller).max_walk_speed(), 1200.0));

        let character = body(&controller).id();
        assert_eq!(
            *log.borrow(),
            vec![
                ControllerEvent::ModeChanged {
                    character,
                    from: MovementMode::Walking,
                    to: MovementMode::Sprinting,
                },
                ControllerEvent::SprintStarted { character },
            ]
        );
    }

    #[test]
    fn test_sprint_release_returns_to_walking() {
        let (world, mut controller) = setup();
        controller.start_sprinting(&world);
        controller.stop_sprinting(&world);

        assert_eq!(controller.mode(), MovementMode::Walking);
        assert!(approx_eq(body(&controller).max_walk_speed(), 600.0));
        assert_eq!(controller.transition_count(), 2);
    }

    #[test]
    fn test_airborne_sprint_waits_for_landing() {
        let (world, mut controller) = setup();
        body_mut(&mut controller).set_grounded(false);

        controller.start_sprinting(&world);
        assert_eq!(controller.mode(), MovementMode::Walking);

        body_mut(&mut controller).set_grounded(true);
        controller.tick(DT, &world);
        assert_eq!(controller.mode(), MovementMode::Sprinting);
    }

    #[test]
    fn test_leaving_ground_stops_sprint() {
        let (world, mut controller) = setup();
        let log = record(&mut controller);
        controller.start_sprinting(&world);

        body_mut(&mut controller).set_grounded(false);
        controller.tick(DT, &world);

        assert_eq!(controller.mode(), MovementMode::Walking);
        assert!(log.borrow().contains(&ControllerEvent::SprintStopped {
            character: body(&controller).id()
        }));
    }

    #[test]
    fn test_crouch_and_stand() {
        let (world, mut controller) = setup();

        controller.start_crouching(&world);
        assert_eq!(controller.mode(), MovementMode::Crouching);
        assert!(body(&controller).is_crouched());
        assert!(approx_eq(body(&controller).max_walk_speed(), 300.0));

        controller.stop_crouching(&world);
        assert_eq!(controller.mode(), MovementMode::Walking);
        assert!(!body(&controller).is_crouched());
        assert!(approx_eq(body(&controller).max_walk_speed(), 600.0));
    }

    #[test]
    fn test_stays_crouched_under_ceiling() {
        let (mut world, mut controller) = setup();
        controller.start_crouching(&world);

        let ceiling = world.add_box(Vec3::new(-100.0, -100.0, 120.0), Vec3::new(100.0, 100.0, 200.0));
        controller.stop_crouching(&world);
        controller.tick(DT, &world);
        assert_eq!(controller.mode(), MovementMode::Crouching);

        world.remove_actor(ceiling);
        controller.tick(DT, &world);
        assert_eq!(controller.mode(), MovementMode::Walking);
        assert!(!body(&controller).is_crouched());
    }

    #[test]
    fn test_sprint_into_slide() {
        let (world, mut controller) = setup();
        controller.start_sprinting(&world);
        let log = record(&mut controller);

        controller.start_crouching(&world);

        assert_eq!(controller.mode(), MovementMode::Sliding);
        let body = body(&controller);
        assert!(body.velocity().abs_diff_eq(Vec3::new(1200.0, 0.0, 0.0), EPSILON));
        assert!(approx_eq(body.ground_friction(), 0.0));
        assert!(approx_eq(body.braking_deceleration(), 1024.0));
        assert!(body.is_crouched());

        let character = body.id();
        assert_eq!(
            *log.borrow(),
            vec![
                ControllerEvent::SprintStopped { character },
                ControllerEvent::ModeChanged {
                    character,
                    from: MovementMode::Sprinting,
                    to: MovementMode::Sliding,
                },
                ControllerEvent::SlideStarted { character },
            ]
        );
    }

    #[test]
    fn test_slide_exit_restores_walking_friction() {
        let (world, mut controller) = setup();
        controller.start_sprinting(&world);
        controller.start_crouching(&world);
        let log = record(&mut controller);

        controller.stop_crouching(&world);
        controller.tick(DT, &world);

        assert_eq!(controller.mode(), MovementMode::Sprinting);
        assert!(approx_eq(body(&controller).ground_friction(), 8.0));
        assert!(approx_eq(body(&controller).braking_deceleration(), 2048.0));
        assert_eq!(log.borrow()[0], ControllerEvent::SlideStopped {
            character: body(&controller).id()
        });
    }

    #[test]
    fn test_slide_decays_into_crouch() {
        let (world, mut controller) = setup();
        controller.start_sprinting(&world);
        controller.start_crouching(&world);

        for _ in 0..120 {
            controller.tick(DT, &world);
            body_mut(&mut controller).step(DT);
        }

        assert_eq!(controller.mode(), MovementMode::Crouching);
        assert!(approx_eq(body(&controller).ground_friction(), 8.0));
        assert!(body(&controller).speed() < 300.0);
    }

    #[test]
    fn test_slope_pushes_and_caps_slide() {
        let (world, mut controller) = setup();
        let tilt = 30f32.to_radians();
        body_mut(&mut controller).set_floor_normal(Vec3::new(tilt.sin(), 0.0, tilt.cos()));
        controller.start_sprinting(&world);
        controller.start_crouching(&world);
        assert_eq!(body(&controller).pending_force(), Vec3::ZERO);

        // Down-slope is +X, along the slide, queued once per frame
        controller.tick(DT, &world);
        let force = body(&controller).pending_force();
        assert!(force.x > 0.0);
        assert!((force.length() - controller.tuning().slide_force_multiplier).abs() < 1.0);

        body_mut(&mut controller).set_velocity(Vec3::new(5000.0, 0.0, 0.0));
        controller.tick(DT, &world);
        assert!(approx_eq(body(&controller).speed(), 2400.0));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let (world, mut controller) = setup();
        controller.start_sprinting(&world);
        let count = controller.transition_count();

        for _ in 0..5 {
            controller.resolve(&world);
        }

        assert_eq!(controller.mode(), MovementMode::Sprinting);
        assert_eq!(controller.transition_count(), count);
    }

    #[test]
    fn test_dash_cycle() {
        let (world, mut controller) = setup();
        let log = record(&mut controller);

        assert!(controller.start_dash());
        assert!(!controller.start_dash());
        assert!(body(&controller).velocity().abs_diff_eq(Vec3::new(6000.0, 0.0, 0.0), EPSILON));
        assert_eq!(controller.dash_phase(), DashPhase::Executing);

        controller.tick(0.05, &world);
        controller.tick(0.06, &world);
        assert_eq!(controller.dash_phase(), DashPhase::CoolingDown);
        assert_eq!(body(&controller).velocity(), Vec3::ZERO);
        assert!(approx_eq(body(&controller).braking_friction_factor(), 2.0));
        assert!(!controller.can_dash());

        controller.tick(1.01, &world);
        assert!(controller.can_dash());

        let character = body(&controller).id();
        assert_eq!(
            *log.borrow(),
            vec![
                ControllerEvent::DashStarted { character },
                ControllerEvent::DashStopped { character },
            ]
        );
    }

    #[test]
    fn test_no_dash_while_crouching_or_sliding() {
        let (world, mut controller) = setup();
        controller.start_crouching(&world);
        assert!(!controller.start_dash());

        controller.stop_crouching(&world);
        controller.start_sprinting(&world);
        controller.start_crouching(&world);
        assert_eq!(controller.mode(), MovementMode::Sliding);
        assert!(!controller.start_dash());
        assert!(!controller.is_dashing());
    }

    #[test]
    fn test_jump_vaults_when_possible() {
        let (_, mut controller) = setup();
        let triggered = Rc::new(Cell::new(0));
        controller.set_vault(TestVault {
            allowed: true,
            triggered: Rc::clone(&triggered),
        });
        let log = record(&mut controller);

        controller.start_jumping();
        body_mut(&mut controller).step(DT);

        assert_eq!(triggered.get(), 1);
        assert!(body(&controller).is_falling());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_jump_without_vault() {
        let (_, mut controller) = setup();
        let triggered = Rc::new(Cell::new(0));
        controller.set_vault(TestVault {
            allowed: false,
            triggered: Rc::clone(&triggered),
        });
        let log = record(&mut controller);

        controller.start_jumping();
        body_mut(&mut controller).step(DT);

        assert_eq!(triggered.get(), 0);
        assert!(body(&controller).is_falling());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_turn_rates() {
        let (world, mut controller) = setup();
        controller.set_axis(Axis::TurnRate, 1.0);
        controller.set_axis(Axis::LookUpRate, -0.5);

        controller.tick(0.5, &world);

        assert!(approx_eq(body(&controller).yaw(), 12.5));
        assert!(approx_eq(body(&controller).pitch(), -6.25));
    }

    #[test]
    fn test_move_axes_feed_the_body() {
        let (world, mut controller) = setup();
        controller.handle_input(ControllerInput::Axis(Axis::MoveForward, 1.0), &world);
        controller.handle_input(ControllerInput::Axis(Axis::MoveRight, 0.5), &world);

        controller.tick(DT, &world);

        let input = body(&controller).pending_input();
        assert!(input.abs_diff_eq(Vec3::new(1.0, -0.5, 0.0), EPSILON));
    }

    #[test]
    fn test_switch_perspective() {
        let (world, mut controller) = setup();
        assert_eq!(controller.perspective(), Perspective::ThirdPerson);

        controller.handle_input(ControllerInput::Pressed(Action::SwitchPerspective), &world);
        assert_eq!(controller.perspective(), Perspective::FirstPerson);

        controller.handle_input(ControllerInput::Released(Action::SwitchPerspective), &world);
        assert_eq!(controller.perspective(), Perspective::FirstPerson);
    }

    #[test]
    fn test_unpossess_resets_state() {
        let (world, mut controller) = setup();
        controller.start_sprinting(&world);
        controller.start_dash();

        let body = controller.unpossess().unwrap();
        assert!(controller.character().is_none());
        assert_eq!(controller.mode(), MovementMode::Walking);
        assert!(!controller.is_dashing());
        assert_eq!(controller.intent(), ControllerIntent::default());

        assert!(controller.possess(body).is_none());
        assert!(approx_eq(controller.character().unwrap().max_walk_speed(), 600.0));
    }

    #[test]
    fn test_unpossess_while_sliding_restores_walking_values() {
        let (world, mut controller) = setup();
        controller.start_sprinting(&world);
        controller.start_crouching(&world);
        let count = controller.transition_count();
        let log = record(&mut controller);

        let body = controller.unpossess().unwrap();

        assert_eq!(controller.mode(), MovementMode::Walking);
        assert_eq!(controller.transition_count(), count + 1);
        assert!(approx_eq(body.ground_friction(), 8.0));
        assert!(approx_eq(body.braking_deceleration(), 2048.0));
        assert!(approx_eq(body.max_walk_speed(), 600.0));
        assert!(!body.is_crouched());

        let character = body.id();
        assert_eq!(
            *log.borrow(),
            vec![
                ControllerEvent::SlideStopped { character },
                ControllerEvent::ModeChanged {
                    character,
                    from: MovementMode::Sliding,
                    to: MovementMode::Walking,
                },
            ]
        );
    }

    #[test]
    fn test_unpossess_while_sprinting_and_dashing_pairs_events() {
        let (world, mut controller) = setup();
        controller.start_sprinting(&world);
        assert!(controller.start_dash());
        let log = record(&mut controller);

        let body = controller.unpossess().unwrap();

        assert!(approx_eq(body.max_walk_speed(), 600.0));
        assert!(approx_eq(body.braking_friction_factor(), 2.0));
        assert_eq!(body.velocity(), Vec3::ZERO);

        let character = body.id();
        assert_eq!(
            *log.borrow(),
            vec![
                ControllerEvent::DashStopped { character },
                ControllerEvent::SprintStopped { character },
                ControllerEvent::ModeChanged {
                    character,
                    from: MovementMode::Sprinting,
                    to: MovementMode::Walking,
                },
            ]
        );
    }

    #[test]
    fn test_dash_intent_follows_the_input() {
        let (world, mut controller) = setup();

        controller.handle_input(ControllerInput::Pressed(Action::Dash), &world);
        assert!(controller.intent().dash);
        assert!(controller.is_dashing());

        controller.handle_input(ControllerInput::Released(Action::Dash), &world);
        assert!(!controller.intent().dash);
        assert!(controller.is_dashing());
    }

    #[test]
    fn test_custom_tuning() {
        let world = World::new();
        let tuning = MovementTuning {
            walk_speed: 400.0,
            ..Default::default()
        };
        let mut controller = PlayerController::with_tuning(tuning);
        controller.possess(KinematicBody::new(ActorId(1), Vec3::new(0.0, 0.0, 96.0)));

        controller.start_sprinting(&world);
        assert!(approx_eq(body(&controller).max_walk_speed(), 800.0));
    }

    #[test]
    fn test_unsubscribed_listener_stops_receiving() {
        let (world, mut controller) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let id = controller.on_event(move |event| sink.borrow_mut().push(*event));

        controller.events_mut().unsubscribe(id);
        controller.start_sprinting(&world);

        assert!(log.borrow().is_empty());
    }
}
