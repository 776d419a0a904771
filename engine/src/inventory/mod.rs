//! Inventory Module
//!
//! Item storage the controller's character carries, and the glue between
//! items and the world.
//!
//! # Components
//!
//! - [`Inventory`] / [`Item`] - Contracts the controller uses items through
//! - [`BasicInventory`] - Item counts with an optional per-item stack cap
//! - [`use_item`] / [`drop_item`] - Use one of an item, or drop a stack into the world
//! - [`ItemPickup`] - Interactable stack lying in the world

pub mod pickup;

use std::collections::BTreeMap;
use std::fmt;

use crate::physics::ActorId;

pub use pickup::{ItemPickup, SharedInventory, PICKUP_DISTANCE};

/// Identifies an item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// A usable item.
pub trait Item {
    fn id(&self) -> ItemId;
    /// How many of this item the stack holds.
    fn quantity(&self) -> u32;
    /// Apply the item's effect to `user`.
    fn use_item(&mut self, user: ActorId);
}

/// Storage of item counts.
pub trait Inventory {
    fn find_item(&self, item: ItemId) -> bool;
    /// Remove up to `quantity`. Returns how many were actually removed.
    fn consume_item(&mut self, item: ItemId, quantity: u32) -> u32;
    /// Add up to `quantity`. Returns how many were actually added.
    fn add_item(&mut self, item: ItemId, quantity: u32) -> u32;
}

/// Item counts keyed by id. Items at zero are removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInventory {
    items: BTreeMap<ItemId, u32>,
    stack_limit: Option<u32>,
}

impl BasicInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inventory holding at most `limit` of any one item.
    pub fn with_stack_limit(limit: u32) -> Self {
        Self {
            items: BTreeMap::new(),
            stack_limit: Some(limit),
        }
    }

    pub fn count(&self, item: ItemId) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.items.iter().map(|(&id, &count)| (id, count))
    }
}

impl Inventory for BasicInventory {
    fn find_item(&self, item: ItemId) -> bool {
        self.count(item) > 0
    }

    fn consume_item(&mut self, item: ItemId, quantity: u32) -> u32 {
        let Some(count) = self.items.get_mut(&item) else {
            return 0;
        };
        let removed = quantity.min(*count);
        *count -= removed;
        if *count == 0 {
            self.items.remove(&item);
        }
        removed
    }

    fn add_item(&mut self, item: ItemId, quantity: u32) -> u32 {
        let current = self.count(item);
        let room = self.stack_limit.map_or(u32::MAX, |limit| limit.saturating_sub(current));
        let added = quantity.min(room).min(u32::MAX - current);
        if added > 0 {
            self.items.insert(item, current + added);
        }
        added
    }
}

/// Use one of `item` if the inventory holds it, then consume one.
///
/// Returns `false` without using anything when the item is not held.
pub fn use_item<I>(inventory: &mut I, item: &mut dyn Item, user: ActorId) -> bool
where
    I: Inventory + ?Sized,
{
    let id = item.id();
    if !inventory.find_item(id) {
        return false;
    }

    item.use_item(user);
    inventory.consume_item(id, 1);
    tracing::debug!(%id, ?user, "item used");
    true
}

/// Take up to `quantity` of `item` out of the inventory as a pickup.
///
/// Returns `None` when nothing could be removed.
pub fn drop_item<I>(inventory: &mut I, item: ItemId, quantity: u32) -> Option<ItemPickup>
where
    I: Inventory + ?Sized,
{
    let removed = inventory.consume_item(item, quantity);
    if removed == 0 {
        return None;
    }
    tracing::debug!(%item, quantity = removed, "item dropped");
    Some(ItemPickup::new(item, removed))
}
