//! Item pickups
//!
//! A stack of items lying in the world. Interacting with it moves as much
//! of the stack as fits into the collecting inventory; whatever does not
//! fit stays on the ground.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Inventory, ItemId};
use crate::interaction::Interactable;
use crate::physics::ActorId;

/// Inventory shared between its owner and the pickups that fill it.
pub type SharedInventory = Rc<RefCell<dyn Inventory>>;

/// Default pickup range (cm).
pub const PICKUP_DISTANCE: f32 = 250.0;

pub struct ItemPickup {
    item: ItemId,
    quantity: u32,
    collector: Option<SharedInventory>,
    interaction_distance: f32,
    interaction_time: f32,
    focused_by: Option<ActorId>,
}

impl std::fmt::Debug for ItemPickup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemPickup")
            .field("item", &self.item)
            .field("quantity", &self.quantity)
            .field("has_collector", &self.collector.is_some())
            .field("focused_by", &self.focused_by)
            .finish()
    }
}

impl ItemPickup {
    /// Instant pickup of `quantity` of `item`, with no collector yet.
    pub fn new(item: ItemId, quantity: u32) -> Self {
        Self {
            item,
            quantity,
            collector: None,
            interaction_distance: PICKUP_DISTANCE,
            interaction_time: 0.0,
            focused_by: None,
        }
    }

    /// Inventory the stack moves into when interacted with.
    pub fn with_collector(mut self, inventory: SharedInventory) -> Self {
        self.collector = Some(inventory);
        self
    }

    pub fn set_collector(&mut self, inventory: SharedInventory) {
        self.collector = Some(inventory);
    }

    pub fn with_interaction_distance(mut self, distance: f32) -> Self {
        self.interaction_distance = distance;
        self
    }

    /// Require the interact input to be held for `seconds`.
    pub fn with_interaction_time(mut self, seconds: f32) -> Self {
        self.interaction_time = seconds;
        self
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Nothing left; the host may despawn the actor.
    pub fn is_collected(&self) -> bool {
        self.quantity == 0
    }

    /// Character currently looking at this pickup.
    pub fn focused_by(&self) -> Option<ActorId> {
        self.focused_by
    }
}

impl Interactable for ItemPickup {
    fn begin_focus(&mut self, character: ActorId) {
        self.focused_by = Some(character);
    }

    fn end_focus(&mut self, character: ActorId) {
        if self.focused_by == Some(character) {
            self.focused_by = None;
        }
    }

    fn begin_interact(&mut self, _character: ActorId) {}

    fn interact(&mut self, character: ActorId) {
        let Some(collector) = self.collector.as_ref() else {
            tracing::warn!(item = %self.item, ?character, "pickup has no collecting inventory");
            return;
        };
        if self.quantity == 0 {
            return;
        }

        let added = collector.borrow_mut().add_item(self.item, self.quantity);
        self.quantity -= added;
        tracing::debug!(item = %self.item, added, left = self.quantity, ?character, "picked up");
    }

    fn end_interact(&mut self, _character: ActorId) {}

    fn interaction_distance(&self) -> f32 {
        self.interaction_distance
    }

    fn interaction_time(&self) -> f32 {
        self.interaction_time
    }
}
