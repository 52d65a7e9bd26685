use crate::inventory_management::{empty_slots, mergeable_slots, ItemContainer};
use crate::items::ItemIdentity;
use crate::transfer::Placement;

// --- Helper Functions ---

/// Plans where `wanted` units of `identity` land in the inventory: matching
/// stacks with room first (slot order), then empty slots. The plan may cover
/// less than `wanted` when the inventory runs out of room.
pub(crate) fn inventory_placements<I: ItemContainer + ?Sized>(
    inventory: &I,
    identity: &ItemIdentity,
    stack_size: u32,
    wanted: u64,
) -> Vec<Placement> {
    let existing = mergeable_slots(inventory, identity, stack_size);
    let empty = empty_slots(inventory).into_iter().map(|slot_index| (slot_index, stack_size));

    let mut remaining = wanted;
    let mut placements = Vec::new();
    for (slot_index, room) in existing.into_iter().chain(empty) {
        if remaining == 0 {
            break;
        }
        let amount = (room as u64).min(remaining) as u32;
        placements.push(Placement { container_index: 0, slot_index, amount });
        remaining -= amount as u64;
    }
    placements
}

/// Room left in the inventory for one identity.
pub fn inventory_room_for<I: ItemContainer + ?Sized>(inventory: &I, identity: &ItemIdentity, stack_size: u32) -> u64 {
    let merge_room: u64 = mergeable_slots(inventory, identity, stack_size)
        .iter()
        .map(|(_, room)| *room as u64)
        .sum();
    merge_room + empty_slots(inventory).len() as u64 * stack_size as u64
}
