//! Runner Sandbox
//!
//! Headless run of the player controller through a small course: a pickup
//! by the spawn, a low tunnel to slide under, and a door to open at the
//! end. Inputs come from a fixed key timeline and every controller event
//! is logged.
//!
//! Usage: `runner_sandbox [controller.json]`
//!
//! Set `RUST_LOG=debug` to also see mode resolution and focus changes.

use std::cell::RefCell;
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use glam::Vec3;
use runner_engine::config::ControllerConfig;
use runner_engine::input::{InputState, KeyCode};
use runner_engine::interaction::Interactable;
use runner_engine::inventory::{BasicInventory, ItemId, ItemPickup};
use runner_engine::logging;
use runner_engine::physics::{ActorId, CharacterBody, KinematicBody, World};
use runner_engine::player::PlayerController;

const FRAME_TIME: f32 = 1.0 / 60.0;
const RUN_SECONDS: f32 = 6.0;

const HEALTH_PACK: ItemId = ItemId(1);

/// (seconds, key, pressed)
const TIMELINE: &[(f32, KeyCode, bool)] = &[
    (0.05, KeyCode::E, true),
    (0.1, KeyCode::E, false),
    (0.1, KeyCode::W, true),
    (0.5, KeyCode::ShiftLeft, true),
    (1.5, KeyCode::ControlLeft, true),
    (2.5, KeyCode::ControlLeft, false),
    (3.0, KeyCode::ShiftLeft, false),
    (4.2, KeyCode::Q, true),
    (4.25, KeyCode::Q, false),
    (4.6, KeyCode::W, false),
    (4.8, KeyCode::E, true),
    (5.6, KeyCode::E, false),
];

/// Door that opens after holding interact.
#[derive(Debug, Default)]
struct Door {
    open: bool,
}

impl Interactable for Door {
    fn begin_focus(&mut self, character: ActorId) {
        tracing::info!(%character, open = self.open, "looking at door");
    }

    fn end_focus(&mut self, _character: ActorId) {}

    fn begin_interact(&mut self, character: ActorId) {
        tracing::info!(%character, "pushing door");
    }

    fn interact(&mut self, character: ActorId) {
        self.open = !self.open;
        tracing::info!(%character, open = self.open, "door toggled");
    }

    fn end_interact(&mut self, _character: ActorId) {}

    fn interaction_distance(&self) -> f32 {
        1000.0
    }

    fn interaction_time(&self) -> f32 {
        0.5
    }
}

struct Course {
    world: World,
    pickup: (ActorId, Rc<RefCell<ItemPickup>>),
    door: Rc<RefCell<Door>>,
}

fn build_course(inventory: &Rc<RefCell<BasicInventory>>) -> Course {
    let mut world = World::new();

    let pickup = Rc::new(RefCell::new(ItemPickup::new(HEALTH_PACK, 2).with_collector(inventory.clone())));
    let pickup_actor = world.add_box(Vec3::new(150.0, -20.0, 140.0), Vec3::new(180.0, 20.0, 180.0));
    world.attach_interactable(pickup_actor, Rc::clone(&pickup));

    // Tunnel: clear for a crouched capsule, too low to stand in
    world.add_box(Vec3::new(1800.0, -300.0, 120.0), Vec3::new(2400.0, 300.0, 300.0));

    let door = Rc::new(RefCell::new(Door::default()));
    let door_actor = world.add_box(Vec3::new(4000.0, -100.0, 0.0), Vec3::new(4020.0, 100.0, 260.0));
    world.attach_interactable(door_actor, Rc::clone(&door));

    Course {
        world,
        pickup: (pickup_actor, pickup),
        door,
    }
}

fn load_config() -> Result<ControllerConfig, runner_engine::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => ControllerConfig::load(Path::new(&path)),
        None => Ok(ControllerConfig::default()),
    }
}

fn main() -> ExitCode {
    logging::init("info");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "could not load controller config");
            return ExitCode::FAILURE;
        }
    };

    let inventory = Rc::new(RefCell::new(BasicInventory::new()));
    let mut course = build_course(&inventory);

    let mut controller = PlayerController::new(config);
    let hero = course.world.spawn_actor();
    controller.possess(KinematicBody::new(hero, Vec3::new(0.0, 0.0, 96.0)));
    controller.on_event(|event| tracing::info!(%event, "controller event"));

    let mut input = InputState::new();
    let mut script = TIMELINE.iter().peekable();
    let mut pickup_in_world = true;
    let mut time = 0.0;

    while time < RUN_SECONDS {
        while let Some(&&(at, key, pressed)) = script.peek() {
            if at > time {
                break;
            }
            script.next();
            if let Some(event) = input.handle_key(key, pressed) {
                controller.handle_input(event, &course.world);
            }
        }
        for event in input.axis_inputs() {
            controller.handle_input(event, &course.world);
        }

        controller.tick(FRAME_TIME, &course.world);
        if let Some(body) = controller.character_mut() {
            body.step(FRAME_TIME);
        }

        let (pickup_actor, pickup) = &course.pickup;
        if pickup_in_world && pickup.borrow().is_collected() {
            course.world.remove_actor(*pickup_actor);
            pickup_in_world = false;
        }

        time += FRAME_TIME;
    }

    let Some(body) = controller.character() else {
        return ExitCode::FAILURE;
    };
    tracing::info!(
        position = ?body.location(),
        mode = %controller.mode(),
        transitions = controller.transition_count(),
        health_packs = inventory.borrow().count(HEALTH_PACK),
        door_open = course.door.borrow().open,
        "run finished"
    );
    ExitCode::SUCCESS
}
