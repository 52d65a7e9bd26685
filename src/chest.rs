use serde::{Deserialize, Serialize};

use crate::inventory_management::ItemContainer;
use crate::items::ItemStack;

// --- Constants ---
pub const NUM_CHEST_SLOTS: usize = 36;
pub const NUM_INVENTORY_SLOTS: usize = 36;

/// Fixed-size, slot-indexed container. Hosts that already have their own
/// storage types implement `ItemContainer` directly; this one covers the
/// common "vector of optional stacks" shape and backs the tests.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chest {
    slots: Vec<Option<ItemStack>>,
}

impl Chest {
    pub fn new(num_slots: usize) -> Self {
        Self { slots: vec![None; num_slots] }
    }

    pub fn from_slots(slots: Vec<Option<ItemStack>>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Drops trailing slots. Models a host shrinking a container.
    pub fn truncate(&mut self, num_slots: usize) {
        self.slots.truncate(num_slots);
    }
}

// --- Trait Implementation ---

impl ItemContainer for Chest {
    fn num_slots(&self) -> usize {
        self.slots.len()
    }

    fn get_slot(&self, slot_index: usize) -> Option<ItemStack> {
        self.slots.get(slot_index).copied().flatten()
    }

    fn set_slot(&mut self, slot_index: usize, stack: Option<ItemStack>) {
        if let Some(slot) = self.slots.get_mut(slot_index) {
            *slot = stack.filter(|s| s.quantity > 0);
        } else {
            log::warn!("[Chest] Ignoring write to slot {} (only {} slots).", slot_index, self.slots.len());
        }
    }
}
