use crate::items::{ItemIdentity, ItemStack};

// --- Generic Item Container Trait ---

/// Trait for host-owned collections that hold items in indexed slots.
/// Both storage containers and the player inventory implement it.
pub trait ItemContainer {
    /// Returns the total number of slots in this container.
    fn num_slots(&self) -> usize;

    /// Gets the stack in a slot.
    /// Returns None if the slot index is invalid or the slot is empty.
    fn get_slot(&self, slot_index: usize) -> Option<ItemStack>;

    /// Replaces the contents of a slot. `None` clears it.
    /// Implementations should ignore invalid indices.
    fn set_slot(&mut self, slot_index: usize, stack: Option<ItemStack>);
}

impl<C: ItemContainer + ?Sized> ItemContainer for &mut C {
    fn num_slots(&self) -> usize {
        (**self).num_slots()
    }

    fn get_slot(&self, slot_index: usize) -> Option<ItemStack> {
        (**self).get_slot(slot_index)
    }

    fn set_slot(&mut self, slot_index: usize, stack: Option<ItemStack>) {
        (**self).set_slot(slot_index, stack)
    }
}

// --- Slot Helpers ---

/// Reads a slot, treating zero-quantity stacks as empty.
pub(crate) fn occupied_slot<C: ItemContainer + ?Sized>(container: &C, slot_index: usize) -> Option<ItemStack> {
    container.get_slot(slot_index).filter(|stack| stack.quantity > 0)
}

/// Checks if all slots in an ItemContainer are empty.
pub fn is_container_empty<C: ItemContainer + ?Sized>(container: &C) -> bool {
    (0..container.num_slots()).all(|i| occupied_slot(container, i).is_none())
}

/// Total quantity of one identity held by a container.
pub fn count_identity<C: ItemContainer + ?Sized>(container: &C, identity: &ItemIdentity) -> u64 {
    (0..container.num_slots())
        .filter_map(|i| occupied_slot(container, i))
        .filter(|stack| stack.identity == *identity)
        .map(|stack| stack.quantity as u64)
        .sum()
}

pub(crate) fn holds_identity<C: ItemContainer + ?Sized>(container: &C, identity: &ItemIdentity) -> bool {
    (0..container.num_slots()).any(|i| {
        occupied_slot(container, i).is_some_and(|stack| stack.identity == *identity)
    })
}

/// Slots holding `identity` that still have room, with the room left in each.
pub(crate) fn mergeable_slots<C: ItemContainer + ?Sized>(
    container: &C,
    identity: &ItemIdentity,
    stack_size: u32,
) -> Vec<(usize, u32)> {
    (0..container.num_slots())
        .filter_map(|i| {
            let stack = occupied_slot(container, i)?;
            let space_available = stack_size.saturating_sub(stack.quantity);
            (stack.identity == *identity && space_available > 0).then_some((i, space_available))
        })
        .collect()
}

pub(crate) fn empty_slots<C: ItemContainer + ?Sized>(container: &C) -> Vec<usize> {
    (0..container.num_slots())
        .filter(|i| occupied_slot(container, *i).is_none())
        .collect()
}

/// Room for `identity` in one slot: the space left on a matching stack, a full
/// stack for an empty slot, zero for a slot holding something else.
pub(crate) fn slot_room<C: ItemContainer + ?Sized>(
    container: &C,
    slot_index: usize,
    identity: &ItemIdentity,
    stack_size: u32,
) -> u32 {
    match occupied_slot(container, slot_index) {
        None => stack_size,
        Some(stack) if stack.identity == *identity => stack_size.saturating_sub(stack.quantity),
        Some(_) => 0,
    }
}

/// Adds `amount` units of `identity` to a slot, creating the stack if the slot is empty.
pub(crate) fn deposit_into_slot<C: ItemContainer + ?Sized>(
    container: &mut C,
    slot_index: usize,
    identity: ItemIdentity,
    amount: u32,
) {
    let new_qty = match occupied_slot(container, slot_index) {
        Some(stack) => stack.quantity + amount,
        None => amount,
    };
    container.set_slot(slot_index, Some(ItemStack::new(identity, new_qty)));
}

/// Removes `amount` units from a slot, clearing it when it reaches zero.
pub(crate) fn withdraw_from_slot<C: ItemContainer + ?Sized>(container: &mut C, slot_index: usize, amount: u32) {
    if let Some(stack) = occupied_slot(container, slot_index) {
        let remaining = stack.quantity.saturating_sub(amount);
        if remaining == 0 {
            container.set_slot(slot_index, None);
        } else {
            container.set_slot(slot_index, Some(ItemStack::new(stack.identity, remaining)));
        }
    }
}
