//! Box World
//!
//! A minimal world made of axis-aligned blockers. Each blocker belongs to
//! an actor; actors may additionally expose an [`Interactable`]. The world
//! owns those interactables (`Rc`), observers such as the interaction
//! scanner only keep weak references to them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;

use super::collision::{CollisionWorld, TraceHit, aabb_contains, aabb_surface_normal, ray_aabb_intersect};
use super::types::ActorId;
use crate::interaction::{Interactable, InteractableSource, SharedInteractable};

/// One solid box of level geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blocker {
    pub actor: ActorId,
    pub min: Vec3,
    pub max: Vec3,
}

impl Blocker {
    pub fn new(actor: ActorId, min: Vec3, max: Vec3) -> Self {
        Self {
            actor,
            min: min.min(max),
            max: min.max(max),
        }
    }
}

/// Collection of blockers and the interactables attached to their actors.
#[derive(Default)]
pub struct World {
    blockers: Vec<Blocker>,
    interactables: HashMap<ActorId, SharedInteractable>,
    next_actor: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh actor id that no blocker uses yet.
    pub fn spawn_actor(&mut self) -> ActorId {
        self.next_actor += 1;
        let id = ActorId(self.next_actor);
        debug_assert!(self.blockers.iter().all(|b| b.actor != id));
        id
    }

    /// Add a box owned by `actor`.
    pub fn add_blocker(&mut self, actor: ActorId, min: Vec3, max: Vec3) {
        self.next_actor = self.next_actor.max(actor.0);
        self.blockers.push(Blocker::new(actor, min, max));
    }

    /// Spawn a new actor made of a single box and return its id.
    pub fn add_box(&mut self, min: Vec3, max: Vec3) -> ActorId {
        let actor = self.spawn_actor();
        self.add_blocker(actor, min, max);
        actor
    }

    /// Attach an interactable capability to an actor.
    pub fn attach_interactable<T>(&mut self, actor: ActorId, interactable: Rc<RefCell<T>>)
    where
        T: Interactable + 'static,
    {
        self.interactables.insert(actor, interactable);
    }

    /// Remove an actor with all of its boxes and its interactable.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_actor(&mut self, actor: ActorId) -> bool {
        let before = self.blockers.len();
        self.blockers.retain(|b| b.actor != actor);
        let removed_interactable = self.interactables.remove(&actor).is_some();
        removed_interactable || self.blockers.len() != before
    }

    pub fn blockers(&self) -> &[Blocker] {
        &self.blockers
    }

    pub fn len(&self) -> usize {
        self.blockers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blockers.is_empty()
    }
}

impl CollisionWorld for World {
    fn line_trace(&self, start: Vec3, end: Vec3, ignore: &[ActorId]) -> Option<TraceHit> {
        let delta = end - start;
        let length = delta.length();
        if length <= f32::EPSILON {
            return None;
        }
        let dir = delta / length;

        self.blockers
            .iter()
            .filter(|b| !ignore.contains(&b.actor))
            .filter(|b| !aabb_contains(start, b.min, b.max))
            .filter_map(|b| {
                let t = ray_aabb_intersect(start, dir, b.min, b.max)?;
                (t <= length).then_some((b, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(b, t)| {
                let point = start + dir * t;
                TraceHit::new(b.actor, point, aabb_surface_normal(point, b.min, b.max), t)
            })
    }
}

impl InteractableSource for World {
    fn interactable(&self, actor: ActorId) -> Option<SharedInteractable> {
        self.interactables.get(&actor).cloned()
    }
}
