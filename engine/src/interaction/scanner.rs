//! Interaction Scanner
//!
//! Traces forward from the viewpoint on a throttled interval and keeps
//! track of which interactable the player is looking at.
//!
//! # Scan Rules
//!
//! When the trace hits an actor exposing an [`Interactable`]:
//! - a different interactable within its own interaction distance takes focus
//! - the focused interactable beyond its interaction distance loses focus
//! - anything else leaves focus unchanged
//!
//! A miss, or a hit on an actor without the capability, clears focus. So
//! does a focused interactable that was removed from the world: its weak
//! reference no longer upgrades and the next scan treats it as not found.
//!
//! # Interact Lifecycle
//!
//! `begin_interact` notifies the focused target, then either fires
//! `interact` right away (zero interaction time) or arms the hold timer.
//! `end_interact` cancels the timer and notifies the target. Losing or
//! switching focus while the input is held ends the interaction first.

use std::rc::{Rc, Weak};
use std::cell::RefCell;

use glam::Vec3;

use super::{INSTANT_INTERACTION_TIME, Interactable, InteractableSource, InteractionConfig, SharedInteractable};
use crate::physics::{ActorId, CollisionWorld};
use crate::timer::AbilityTimer;

/// What a scan changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The scan was throttled and did not trace.
    Skipped,
    /// Focus did not change.
    Unchanged,
    /// Focus moved to this actor.
    Focused(ActorId),
    /// Focus was cleared. Carries the previously focused actor.
    Unfocused(ActorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InteractTimeout;

struct Focus {
    actor: ActorId,
    target: Weak<RefCell<dyn Interactable>>,
}

pub struct InteractionScanner {
    config: InteractionConfig,

    /// Currently focused interactable. Non-owning.
    focus: Option<Focus>,

    /// Time accumulated by `tick`
    clock: f32,

    /// Clock value of the last trace, `None` before the first one
    last_check_time: Option<f32>,

    /// Whether the interact input is held
    interact_held: bool,

    /// Fires `interact` after the focused target's interaction time
    interact_timer: AbilityTimer<InteractTimeout>,
}

impl std::fmt::Debug for InteractionScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionScanner")
            .field("config", &self.config)
            .field("focused_actor", &self.focused_actor())
            .field("interact_held", &self.interact_held)
            .field("interact_timer", &self.interact_timer.remaining())
            .finish()
    }
}

impl Default for InteractionScanner {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl InteractionScanner {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            focus: None,
            clock: 0.0,
            last_check_time: None,
            interact_held: false,
            interact_timer: AbilityTimer::new(),
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Actor of the current focus, even if it has since left the world.
    pub fn focused_actor(&self) -> Option<ActorId> {
        self.focus.as_ref().map(|f| f.actor)
    }

    /// The focused interactable, if it is still alive.
    pub fn focused(&self) -> Option<SharedInteractable> {
        self.focus.as_ref().and_then(|f| f.target.upgrade())
    }

    pub fn is_interact_held(&self) -> bool {
        self.interact_held
    }

    /// Whether a timed interaction is waiting to fire.
    pub fn is_interact_pending(&self) -> bool {
        self.interact_timer.is_pending()
    }

    /// Seconds left on the timed interaction, 0 when none is pending.
    pub fn interact_remaining(&self) -> f32 {
        self.interact_timer.remaining()
    }

    /// Clock value of the last trace.
    pub fn last_check_time(&self) -> Option<f32> {
        self.last_check_time
    }

    /// Advance timers and scan if the check interval has elapsed.
    ///
    /// `view` is the trace origin and direction.
    pub fn tick<W, S>(
        &mut self,
        dt: f32,
        world: &W,
        source: &S,
        character: ActorId,
        view: (Vec3, Vec3),
    ) -> ScanOutcome
    where
        W: CollisionWorld + ?Sized,
        S: InteractableSource + ?Sized,
    {
        self.clock += dt.max(0.0);

        if self.interact_timer.tick(dt).is_some() {
            if let Some(target) = self.focused() {
                tracing::debug!(?character, "timed interaction fired");
                target.borrow_mut().interact(character);
            }
        }

        let due = match self.last_check_time {
            None => true,
            Some(last) => self.config.check_interval <= 0.0 || self.clock - last >= self.config.check_interval,
        };
        if !due {
            return ScanOutcome::Skipped;
        }

        self.last_check_time = Some(self.clock);
        self.check(world, source, character, view)
    }

    /// Trace once and update focus.
    pub fn check<W, S>(&mut self, world: &W, source: &S, character: ActorId, view: (Vec3, Vec3)) -> ScanOutcome
    where
        W: CollisionWorld + ?Sized,
        S: InteractableSource + ?Sized,
    {
        let (origin, direction) = view;
        let end = origin + direction.normalize_or_zero() * self.config.trace_distance;

        let Some(hit) = world.line_trace(origin, end, &[character]) else {
            return self.couldnt_find_interactable(character);
        };
        let Some(candidate) = source.interactable(hit.actor) else {
            return self.couldnt_find_interactable(character);
        };

        let current = self.focused();
        let is_current = current.as_ref().is_some_and(|c| Rc::ptr_eq(c, &candidate));
        let in_range = hit.distance <= candidate.borrow().interaction_distance();

        tracing::trace!(actor = ?hit.actor, distance = hit.distance, in_range, is_current, "interaction trace hit");

        if !is_current && in_range {
            self.found_new_interactable(character, hit.actor, &candidate);
            ScanOutcome::Focused(hit.actor)
        } else if is_current && !in_range {
            self.couldnt_find_interactable(character)
        } else {
            ScanOutcome::Unchanged
        }
    }

    fn found_new_interactable(&mut self, character: ActorId, actor: ActorId, candidate: &SharedInteractable) {
        if self.interact_held {
            self.end_interact(character);
        }

        if let Some(old) = self.focused() {
            old.borrow_mut().end_focus(character);
        }

        tracing::debug!(?character, ?actor, "interaction focus gained");
        self.focus = Some(Focus {
            actor,
            target: Rc::downgrade(candidate),
        });
        candidate.borrow_mut().begin_focus(character);
    }

    fn couldnt_find_interactable(&mut self, character: ActorId) -> ScanOutcome {
        self.interact_timer.cancel();

        let Some((previous, target)) = self.focus.as_ref().map(|f| (f.actor, f.target.upgrade())) else {
            return ScanOutcome::Unchanged;
        };

        if let Some(target) = target {
            if self.interact_held {
                self.end_interact(character);
            }
            target.borrow_mut().end_focus(character);
        } else {
            self.interact_held = false;
        }

        tracing::debug!(?character, actor = ?previous, "interaction focus lost");
        self.focus = None;
        ScanOutcome::Unfocused(previous)
    }

    /// Drop focus as if nothing was found, ending any held interaction.
    pub fn clear_focus(&mut self, character: ActorId) -> ScanOutcome {
        let outcome = self.couldnt_find_interactable(character);
        self.interact_held = false;
        outcome
    }

    /// Interact input pressed.
    pub fn begin_interact(&mut self, character: ActorId) {
        self.interact_held = true;

        let Some(target) = self.focused() else {
            return;
        };

        target.borrow_mut().begin_interact(character);

        let interaction_time = target.borrow().interaction_time();
        if interaction_time <= INSTANT_INTERACTION_TIME {
            target.borrow_mut().interact(character);
        } else {
            self.interact_timer.arm(interaction_time, InteractTimeout);
        }
    }

    /// Interact input released.
    pub fn end_interact(&mut self, character: ActorId) {
        self.interact_held = false;
        self.interact_timer.cancel();

        if let Some(target) = self.focused() {
            target.borrow_mut().end_interact(character);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::World;

    const HERO: ActorId = ActorId(1000);

    #[derive(Debug, Default)]
    struct Counter {
        begin_focus: u32,
        end_focus: u32,
        begin_interact: u32,
        interact: u32,
        end_interact: u32,
        distance: f32,
        time: f32,
    }

    impl Counter {
        fn shared(distance: f32, time: f32) -> Rc<RefCell<Counter>> {
            Rc::new(RefCell::new(Counter {
                distance,
                time,
                ..Default::default()
            }))
        }
    }

    impl Interactable for Counter {
        fn begin_focus(&mut self, _: ActorId) {
            self.begin_focus += 1;
        }
        fn end_focus(&mut self, _: ActorId) {
            self.end_focus += 1;
        }
        fn begin_interact(&mut self, _: ActorId) {
            self.begin_interact += 1;
        }
        fn interact(&mut self, _: ActorId) {
            self.interact += 1;
        }
        fn end_interact(&mut self, _: ActorId) {
            self.end_interact += 1;
        }
        fn interaction_distance(&self) -> f32 {
            self.distance
        }
        fn interaction_time(&self) -> f32 {
            self.time
        }
    }

    const VIEW: (Vec3, Vec3) = (Vec3::new(0.0, 0.0, 100.0), Vec3::X);

    /// A crate at `distance` along +X, in the line of sight.
    fn world_with_crate(distance: f32, counter: &Rc<RefCell<Counter>>) -> (World, ActorId) {
        let mut world = World::new();
        let actor = world.add_box(
            Vec3::new(distance, -20.0, 80.0),
            Vec3::new(distance + 40.0, 20.0, 120.0),
        );
        world.attach_interactable(actor, Rc::clone(counter));
        (world, actor)
    }

    #[test]
    fn test_same_target_twice_focuses_once() {
        let target = Counter::shared(400.0, 0.0);
        let (world, actor) = world_with_crate(200.0, &target);
        let mut scanner = InteractionScanner::default();

        assert_eq!(scanner.check(&world, &world, HERO, VIEW), ScanOutcome::Focused(actor));
        assert_eq!(scanner.check(&world, &world, HERO, VIEW), ScanOutcome::Unchanged);

        assert_eq!(target.borrow().begin_focus, 1);
        assert_eq!(target.borrow().end_focus, 0);
        assert_eq!(scanner.focused_actor(), Some(actor));
    }

    #[test]
    fn test_out_of_range_target_is_not_focused() {
        let target = Counter::shared(400.0, 0.0);
        let (world, _) = world_with_crate(500.0, &target);
        let mut scanner = InteractionScanner::default();

        assert_eq!(scanner.check(&world, &world, HERO, VIEW), ScanOutcome::Unchanged);
        assert_eq!(target.borrow().begin_focus, 0);
    }

    #[test]
    fn test_moving_out_of_range_ends_focus_once() {
        let target = Counter::shared(400.0, 0.0);
        let (world, _) = world_with_crate(300.0, &target);
        let mut scanner = InteractionScanner::default();
        scanner.check(&world, &world, HERO, VIEW);

        // Step back so the crate is 500 away
        let far_view = (VIEW.0 - Vec3::X * 200.0, Vec3::X);
        assert!(matches!(scanner.check(&world, &world, HERO, far_view), ScanOutcome::Unfocused(_)));
        assert_eq!(scanner.check(&world, &world, HERO, far_view), ScanOutcome::Unchanged);

        assert_eq!(target.borrow().end_focus, 1);
        assert_eq!(scanner.focused_actor(), None);
    }

    #[test]
    fn test_miss_while_holding_ends_interact_then_focus() {
        let target = Counter::shared(400.0, 2.0);
        let (world, _) = world_with_crate(200.0, &target);
        let mut scanner = InteractionScanner::default();
        scanner.check(&world, &world, HERO, VIEW);
        scanner.begin_interact(HERO);
        assert!(scanner.is_interact_pending());

        let away = (VIEW.0, -Vec3::X);
        assert!(matches!(scanner.check(&world, &world, HERO, away), ScanOutcome::Unfocused(_)));

        let t = target.borrow();
        assert_eq!(t.end_interact, 1);
        assert_eq!(t.end_focus, 1);
        assert_eq!(t.interact, 0);
        assert!(!scanner.is_interact_held());
        assert!(!scanner.is_interact_pending());
    }

    #[test]
    fn test_instant_interaction_fires_on_press() {
        let target = Counter::shared(400.0, 0.0);
        let (world, _) = world_with_crate(200.0, &target);
        let mut scanner = InteractionScanner::default();
        scanner.check(&world, &world, HERO, VIEW);

        scanner.begin_interact(HERO);
        assert_eq!(target.borrow().begin_interact, 1);
        assert_eq!(target.borrow().interact, 1);
        assert!(!scanner.is_interact_pending());

        scanner.end_interact(HERO);
        assert_eq!(target.borrow().end_interact, 1);
    }

    #[test]
    fn test_timed_interaction_fires_after_hold() {
        let target = Counter::shared(400.0, 0.5);
        let (world, _) = world_with_crate(200.0, &target);
        let mut scanner = InteractionScanner::default();
        scanner.tick(0.016, &world, &world, HERO, VIEW);

        scanner.begin_interact(HERO);
        assert_eq!(target.borrow().interact, 0);

        for _ in 0..20 {
            scanner.tick(0.016, &world, &world, HERO, VIEW);
        }
        assert_eq!(target.borrow().interact, 0);

        for _ in 0..20 {
            scanner.tick(0.016, &world, &world, HERO, VIEW);
        }
        assert_eq!(target.borrow().interact, 1);
    }

    #[test]
    fn test_release_cancels_timed_interaction() {
        let target = Counter::shared(400.0, 0.5);
        let (world, _) = world_with_crate(200.0, &target);
        let mut scanner = InteractionScanner::default();
        scanner.tick(0.016, &world, &world, HERO, VIEW);

        scanner.begin_interact(HERO);
        scanner.tick(0.2, &world, &world, HERO, VIEW);
        scanner.end_interact(HERO);
        for _ in 0..10 {
            scanner.tick(0.1, &world, &world, HERO, VIEW);
        }
        assert_eq!(target.borrow().interact, 0);
        assert_eq!(target.borrow().end_interact, 1);
    }

    #[test]
    fn test_switching_focus() {
        let near = Counter::shared(400.0, 2.0);
        let far = Counter::shared(400.0, 2.0);
        let mut world = World::new();
        let near_actor = world.add_box(Vec3::new(100.0, -20.0, 80.0), Vec3::new(140.0, 20.0, 120.0));
        world.attach_interactable(near_actor, Rc::clone(&near));
        let far_actor = world.add_box(Vec3::new(300.0, -20.0, 80.0), Vec3::new(340.0, 20.0, 120.0));
        world.attach_interactable(far_actor, Rc::clone(&far));

        let mut scanner = InteractionScanner::default();
        scanner.check(&world, &world, HERO, VIEW);
        scanner.begin_interact(HERO);

        world.remove_actor(near_actor);
        // `near` is still alive through this test's handle, only detached from the world
        assert_eq!(scanner.check(&world, &world, HERO, VIEW), ScanOutcome::Focused(far_actor));

        assert_eq!(near.borrow().end_interact, 1);
        assert_eq!(near.borrow().end_focus, 1);
        assert_eq!(far.borrow().begin_focus, 1);
        assert!(!scanner.is_interact_held());
    }

    #[test]
    fn test_stale_focus_is_cleared_quietly() {
        let mut world = World::new();
        let actor = world.add_box(Vec3::new(200.0, -20.0, 80.0), Vec3::new(240.0, 20.0, 120.0));
        world.attach_interactable(actor, Counter::shared(400.0, 0.0));

        let mut scanner = InteractionScanner::default();
        assert_eq!(scanner.check(&world, &world, HERO, VIEW), ScanOutcome::Focused(actor));

        // The world held the only strong reference
        world.remove_actor(actor);
        assert!(scanner.focused().is_none());
        assert_eq!(scanner.check(&world, &world, HERO, VIEW), ScanOutcome::Unfocused(actor));
        assert_eq!(scanner.focused_actor(), None);
    }

    #[test]
    fn test_check_interval_throttles_traces() {
        let target = Counter::shared(400.0, 0.0);
        let (world, actor) = world_with_crate(200.0, &target);
        let mut scanner = InteractionScanner::new(InteractionConfig {
            check_interval: 0.1,
            ..Default::default()
        });

        assert_eq!(scanner.tick(0.016, &world, &world, HERO, VIEW), ScanOutcome::Focused(actor));
        assert_eq!(scanner.tick(0.05, &world, &world, HERO, VIEW), ScanOutcome::Skipped);
        assert_eq!(scanner.tick(0.06, &world, &world, HERO, VIEW), ScanOutcome::Unchanged);
    }

    #[test]
    fn test_plain_geometry_clears_focus() {
        let target = Counter::shared(400.0, 0.0);
        let (mut world, _) = world_with_crate(300.0, &target);
        let mut scanner = InteractionScanner::default();
        scanner.check(&world, &world, HERO, VIEW);

        // A wall without the capability slides in front of the crate
        world.add_box(Vec3::new(100.0, -50.0, 0.0), Vec3::new(110.0, 50.0, 200.0));
        assert!(matches!(scanner.check(&world, &world, HERO, VIEW), ScanOutcome::Unfocused(_)));
        assert_eq!(target.borrow().end_focus, 1);
    }
}
