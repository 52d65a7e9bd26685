use log;
use serde::Serialize;

use crate::config::{DepositPreference, TransferAmount};
use crate::entry::ItemEntry;
use crate::error::TransferError;
use crate::inventory_management::{
    deposit_into_slot, empty_slots, holds_identity, mergeable_slots, occupied_slot, slot_room,
    withdraw_from_slot, ItemContainer,
};
use crate::items::{ItemCatalog, ItemIdentity};
use crate::player_inventory::inventory_placements;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TransferDirection {
    ToInventory,
    ToContainers,
}

/// Outcome of a transfer that moved at least one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    pub identity: ItemIdentity,
    pub direction: TransferDirection,
    /// What the click asked for, after capping to what was available
    pub requested: u64,
    pub moved: u64,
}

impl TransferReport {
    /// Capacity ran out before the requested amount was moved.
    pub fn is_partial(&self) -> bool {
        self.moved < self.requested
    }
}

/// A planned write: `amount` units into or out of one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub container_index: usize,
    pub slot_index: usize,
    pub amount: u32,
}

fn resolve_amount(amount: TransferAmount, single_stack: u64, available: u64) -> u64 {
    match amount {
        TransferAmount::OneUnit => 1u64.min(available),
        TransferAmount::FullStack => single_stack.min(available),
        TransferAmount::All => available,
    }
}

/// Takes up to `wanted` units from `sources` in order, trimming the last one.
fn take_from(sources: &[Placement], wanted: u64) -> Vec<Placement> {
    let mut remaining = wanted;
    let mut taken = Vec::new();
    for source in sources {
        if remaining == 0 {
            break;
        }
        let amount = (source.amount as u64).min(remaining) as u32;
        taken.push(Placement { amount, ..*source });
        remaining -= amount as u64;
    }
    taken
}

fn total(placements: &[Placement]) -> u64 {
    placements.iter().map(|p| p.amount as u64).sum()
}

// --- Containers -> Inventory ---

/// Moves items of `entry`'s identity from the containers into the inventory.
///
/// Recorded source locations are re-read first; anything that no longer holds
/// the identity is skipped. The whole move is planned before the first write,
/// so a rejected transfer changes nothing.
pub fn transfer_out<C: ItemContainer, I: ItemContainer + ?Sized>(
    containers: &mut [C],
    inventory: &mut I,
    entry: &ItemEntry,
    amount: TransferAmount,
    catalog: &ItemCatalog,
) -> Result<TransferReport, TransferError> {
    let identity = entry.identity;
    let stack_size = catalog.stack_size(&identity);

    // --- 1. Re-validate sources against live slots ---
    let mut sources = Vec::with_capacity(entry.sources.len());
    for location in &entry.sources {
        let live = containers
            .get(location.container_index)
            .and_then(|container| occupied_slot(container, location.slot_index))
            .filter(|stack| stack.identity == identity);
        match live {
            Some(stack) => sources.push(Placement {
                container_index: location.container_index,
                slot_index: location.slot_index,
                amount: stack.quantity,
            }),
            None => log::warn!(
                "[Transfer Out] Stale source for {:?}: container {} slot {} no longer holds it",
                identity, location.container_index, location.slot_index
            ),
        }
    }
    let available = total(&sources);
    if available == 0 {
        log::warn!("[Transfer Out] Nothing left of {:?} to move", identity);
        return Err(TransferError::SourceEmpty);
    }
    let requested = resolve_amount(amount, stack_size as u64, available);

    // --- 2. Plan inventory placements ---
    let destinations = inventory_placements(&*inventory, &identity, stack_size, requested);
    let moved = total(&destinations);
    if moved == 0 {
        log::warn!("[Transfer Out] Inventory has no room for {:?}", identity);
        return Err(TransferError::DestinationFull { identity });
    }

    // --- 3. Apply ---
    for placement in &destinations {
        deposit_into_slot(&mut *inventory, placement.slot_index, identity, placement.amount);
    }
    for source in take_from(&sources, moved) {
        withdraw_from_slot(&mut containers[source.container_index], source.slot_index, source.amount);
    }

    log::info!(
        "[Transfer Out] Moved {} of {} requested {} ({:?}) into inventory",
        moved, requested, entry.display_name, identity
    );
    Ok(TransferReport {
        identity,
        direction: TransferDirection::ToInventory,
        requested,
        moved,
    })
}

// --- Inventory -> Containers ---

/// Plans where `wanted` units of `identity` go across the containers.
pub(crate) fn container_placements<C: ItemContainer>(
    containers: &[C],
    identity: &ItemIdentity,
    stack_size: u32,
    wanted: u64,
    preference: DepositPreference,
) -> Vec<Placement> {
    let mut candidates: Vec<(usize, usize, u32)> = Vec::new();
    match preference {
        DepositPreference::ExistingStackFirst => {
            for (ci, container) in containers.iter().enumerate() {
                for (si, room) in mergeable_slots(container, identity, stack_size) {
                    candidates.push((ci, si, room));
                }
            }
            // Empty slots next to existing stacks come before unrelated containers
            let (holding, other): (Vec<usize>, Vec<usize>) =
                (0..containers.len()).partition(|ci| holds_identity(&containers[*ci], identity));
            for ci in holding.into_iter().chain(other) {
                for si in empty_slots(&containers[ci]) {
                    candidates.push((ci, si, stack_size));
                }
            }
        }
        DepositPreference::FirstAvailable => {
            for (ci, container) in containers.iter().enumerate() {
                for si in 0..container.num_slots() {
                    let room = slot_room(container, si, identity, stack_size);
                    if room > 0 {
                        candidates.push((ci, si, room));
                    }
                }
            }
        }
    }

    let mut remaining = wanted;
    let mut placements = Vec::new();
    for (container_index, slot_index, room) in candidates {
        if remaining == 0 {
            break;
        }
        let amount = (room as u64).min(remaining) as u32;
        placements.push(Placement { container_index, slot_index, amount });
        remaining -= amount as u64;
    }
    placements
}

/// Moves the item in `inventory_slot` into the containers.
///
/// `FullStack` moves the clicked stack; `All` also sweeps every other
/// inventory stack of the same identity, clicked slot first.
pub fn transfer_in<C: ItemContainer, I: ItemContainer + ?Sized>(
    containers: &mut [C],
    inventory: &mut I,
    inventory_slot: usize,
    amount: TransferAmount,
    preference: DepositPreference,
    catalog: &ItemCatalog,
) -> Result<TransferReport, TransferError> {
    // --- 1. Resolve the clicked stack ---
    let Some(clicked) = occupied_slot(&*inventory, inventory_slot) else {
        log::warn!("[Transfer In] Inventory slot {} is empty", inventory_slot);
        return Err(TransferError::SourceEmpty);
    };
    let identity = clicked.identity;
    let stack_size = catalog.stack_size(&identity);

    let mut sources = vec![Placement { container_index: 0, slot_index: inventory_slot, amount: clicked.quantity }];
    if amount == TransferAmount::All {
        for slot_index in (0..inventory.num_slots()).filter(|i| *i != inventory_slot) {
            if let Some(stack) = occupied_slot(&*inventory, slot_index).filter(|s| s.identity == identity) {
                sources.push(Placement { container_index: 0, slot_index, amount: stack.quantity });
            }
        }
    }
    let available = total(&sources);
    let requested = resolve_amount(amount, clicked.quantity as u64, available);

    // --- 2. Plan container placements ---
    let destinations = container_placements(containers, &identity, stack_size, requested, preference);
    let moved = total(&destinations);
    if moved == 0 {
        log::warn!("[Transfer In] No container has room for {:?}", identity);
        return Err(TransferError::DestinationFull { identity });
    }

    // --- 3. Apply ---
    for placement in &destinations {
        deposit_into_slot(&mut containers[placement.container_index], placement.slot_index, identity, placement.amount);
    }
    for source in take_from(&sources, moved) {
        withdraw_from_slot(&mut *inventory, source.slot_index, source.amount);
    }

    log::info!(
        "[Transfer In] Moved {} of {} requested {:?} from inventory slot {} into containers",
        moved, requested, identity, inventory_slot
    );
    Ok(TransferReport {
        identity,
        direction: TransferDirection::ToContainers,
        requested,
        moved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::rebuild;
    use crate::chest::Chest;
    use crate::inventory_management::count_identity;
    use crate::items::ItemStack;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const WOOD: ItemIdentity = ItemIdentity { def_id: 1, quality: 0 };
    const STONE: ItemIdentity = ItemIdentity { def_id: 2, quality: 0 };
    const HATCHET: ItemIdentity = ItemIdentity { def_id: 8, quality: 0 };

    fn entry_for(containers: &[Chest], identity: ItemIdentity) -> ItemEntry {
        rebuild(containers, &ItemCatalog::with_defaults())
            .into_iter()
            .find(|e| e.identity == identity)
            .unwrap()
    }

    fn total_of(containers: &[Chest], inventory: &Chest, identity: &ItemIdentity) -> u64 {
        containers.iter().map(|c| count_identity(c, identity)).sum::<u64>() + count_identity(inventory, identity)
    }

    #[test]
    fn test_one_unit_out() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests = vec![Chest::from_slots(vec![Some(ItemStack::new(WOOD, 5))])];
        let mut inventory = Chest::new(4);
        let entry = entry_for(&chests, WOOD);

        let report = transfer_out(&mut chests, &mut inventory, &entry, TransferAmount::OneUnit, &catalog).unwrap();
        assert_eq!(report.moved, 1);
        assert!(!report.is_partial());
        assert_eq!(chests[0].get_slot(0), Some(ItemStack::new(WOOD, 4)));
        assert_eq!(inventory.get_slot(0), Some(ItemStack::new(WOOD, 1)));
    }

    #[test]
    fn test_bulk_out_is_capacity_limited() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests = vec![Chest::from_slots(vec![Some(ItemStack::new(STONE, 80))])];
        let mut inventory = Chest::from_slots(vec![Some(ItemStack::new(STONE, 950)), Some(ItemStack::new(WOOD, 3))]);
        let entry = entry_for(&chests, STONE);

        let report = transfer_out(&mut chests, &mut inventory, &entry, TransferAmount::All, &catalog).unwrap();
        assert_eq!(report.requested, 80);
        assert_eq!(report.moved, 49);
        assert!(report.is_partial());
        assert_eq!(chests[0].get_slot(0), Some(ItemStack::new(STONE, 31)));
        assert_eq!(inventory.get_slot(0), Some(ItemStack::new(STONE, 999)));
    }

    #[test]
    fn test_bulk_out_draws_sources_in_order() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests = vec![
            Chest::from_slots(vec![Some(ItemStack::new(WOOD, 10)), Some(ItemStack::new(WOOD, 10))]),
            Chest::from_slots(vec![Some(ItemStack::new(WOOD, 10))]),
        ];
        let mut inventory = Chest::from_slots(vec![Some(ItemStack::new(WOOD, 984))]);
        let entry = entry_for(&chests, WOOD);

        let report = transfer_out(&mut chests, &mut inventory, &entry, TransferAmount::All, &catalog).unwrap();
        assert_eq!(report.moved, 15);
        assert_eq!(chests[0].get_slot(0), None);
        assert_eq!(chests[0].get_slot(1), Some(ItemStack::new(WOOD, 5)));
        assert_eq!(chests[1].get_slot(0), Some(ItemStack::new(WOOD, 10)));
    }

    #[test]
    fn test_full_stack_prefers_existing_then_empty_slots() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests = vec![Chest::from_slots(vec![Some(ItemStack::new(WOOD, 999)), Some(ItemStack::new(WOOD, 500))])];
        let mut inventory = Chest::from_slots(vec![None, Some(ItemStack::new(WOOD, 990)), None]);
        let entry = entry_for(&chests, WOOD);

        let report = transfer_out(&mut chests, &mut inventory, &entry, TransferAmount::FullStack, &catalog).unwrap();
        assert_eq!(report.moved, 999);
        assert_eq!(inventory.get_slot(1), Some(ItemStack::new(WOOD, 999)));
        assert_eq!(inventory.get_slot(0), Some(ItemStack::new(WOOD, 990)));
        assert_eq!(inventory.get_slot(2), None);
        assert_eq!(chests[0].get_slot(0), None);
        assert_eq!(chests[0].get_slot(1), Some(ItemStack::new(WOOD, 500)));
    }

    #[test]
    fn test_destination_full_changes_nothing() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests = vec![Chest::from_slots(vec![Some(ItemStack::new(WOOD, 5))])];
        let mut inventory = Chest::from_slots(vec![Some(ItemStack::new(STONE, 1)), Some(ItemStack::new(HATCHET, 1))]);
        let entry = entry_for(&chests, WOOD);
        let (chests_before, inventory_before) = (chests.clone(), inventory.clone());

        let err = transfer_out(&mut chests, &mut inventory, &entry, TransferAmount::All, &catalog).unwrap_err();
        assert_eq!(err, TransferError::DestinationFull { identity: WOOD });
        assert_eq!(chests, chests_before);
        assert_eq!(inventory, inventory_before);
    }

    #[test]
    fn test_stale_entry_reports_source_empty() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests = vec![Chest::from_slots(vec![Some(ItemStack::new(WOOD, 5))])];
        let mut inventory = Chest::new(2);
        let entry = entry_for(&chests, WOOD);
        chests[0].set_slot(0, Some(ItemStack::new(STONE, 5)));

        let err = transfer_out(&mut chests, &mut inventory, &entry, TransferAmount::OneUnit, &catalog).unwrap_err();
        assert_eq!(err, TransferError::SourceEmpty);
        assert!(crate::inventory_management::is_container_empty(&inventory));

        chests.clear();
        let err = transfer_out(&mut chests, &mut inventory, &entry, TransferAmount::OneUnit, &catalog).unwrap_err();
        assert_eq!(err, TransferError::SourceEmpty);
    }

    #[test]
    fn test_transfer_in_prefers_container_holding_item() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests = vec![
            Chest::from_slots(vec![None, Some(ItemStack::new(STONE, 4))]),
            Chest::from_slots(vec![Some(ItemStack::new(WOOD, 998)), None]),
        ];
        let mut inventory = Chest::from_slots(vec![Some(ItemStack::new(WOOD, 20))]);

        let report = transfer_in(&mut chests, &mut inventory, 0, TransferAmount::FullStack, DepositPreference::ExistingStackFirst, &catalog).unwrap();
        assert_eq!(report.moved, 20);
        assert_eq!(chests[1].get_slot(0), Some(ItemStack::new(WOOD, 999)));
        assert_eq!(chests[1].get_slot(1), Some(ItemStack::new(WOOD, 19)));
        assert_eq!(chests[0].get_slot(0), None);
        assert_eq!(inventory.get_slot(0), None);
    }

    #[test]
    fn test_transfer_in_first_available() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests = vec![
            Chest::from_slots(vec![None, Some(ItemStack::new(STONE, 4))]),
            Chest::from_slots(vec![Some(ItemStack::new(WOOD, 998)), None]),
        ];
        let mut inventory = Chest::from_slots(vec![Some(ItemStack::new(WOOD, 20))]);

        transfer_in(&mut chests, &mut inventory, 0, TransferAmount::FullStack, DepositPreference::FirstAvailable, &catalog).unwrap();
        assert_eq!(chests[0].get_slot(0), Some(ItemStack::new(WOOD, 20)));
        assert_eq!(chests[1].get_slot(0), Some(ItemStack::new(WOOD, 998)));
    }

    #[test]
    fn test_transfer_in_all_sweeps_inventory() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests = vec![Chest::new(3)];
        let mut inventory = Chest::from_slots(vec![
            Some(ItemStack::new(WOOD, 3)),
            Some(ItemStack::new(STONE, 2)),
            Some(ItemStack::new(WOOD, 7)),
        ]);

        let report = transfer_in(&mut chests, &mut inventory, 2, TransferAmount::All, DepositPreference::default(), &catalog).unwrap();
        assert_eq!(report.moved, 10);
        assert_eq!(chests[0].get_slot(0), Some(ItemStack::new(WOOD, 10)));
        assert_eq!(inventory.get_slot(0), None);
        assert_eq!(inventory.get_slot(1), Some(ItemStack::new(STONE, 2)));
    }

    #[test]
    fn test_transfer_in_empty_slot_and_no_containers() {
        let catalog = ItemCatalog::with_defaults();
        let mut chests: Vec<Chest> = Vec::new();
        let mut inventory = Chest::from_slots(vec![None, Some(ItemStack::new(WOOD, 3))]);
        assert_eq!(
            transfer_in(&mut chests, &mut inventory, 0, TransferAmount::OneUnit, DepositPreference::default(), &catalog),
            Err(TransferError::SourceEmpty)
        );
        assert_eq!(
            transfer_in(&mut chests, &mut inventory, 1, TransferAmount::OneUnit, DepositPreference::default(), &catalog),
            Err(TransferError::DestinationFull { identity: WOOD })
        );
        assert_eq!(inventory.get_slot(1), Some(ItemStack::new(WOOD, 3)));
    }

    #[test]
    fn test_transfers_conserve_quantity() {
        let catalog = ItemCatalog::with_defaults();
        let mut rng = StdRng::seed_from_u64(2024);
        let identities = [WOOD, STONE, HATCHET];
        let random_slot = |rng: &mut StdRng| {
            if rng.gen_bool(0.4) {
                None
            } else {
                let identity = identities[rng.gen_range(0..identities.len())];
                let cap = catalog.stack_size(&identity);
                Some(ItemStack::new(identity, rng.gen_range(1..=cap)))
            }
        };
        let amounts = [TransferAmount::OneUnit, TransferAmount::FullStack, TransferAmount::All];

        for _ in 0..300 {
            let mut chests: Vec<Chest> = (0..rng.gen_range(1..4))
                .map(|_| Chest::from_slots((0..rng.gen_range(1..6)).map(|_| random_slot(&mut rng)).collect()))
                .collect();
            let mut inventory = Chest::from_slots((0..rng.gen_range(1..6)).map(|_| random_slot(&mut rng)).collect());
            let amount = amounts[rng.gen_range(0..amounts.len())];

            if rng.gen_bool(0.5) {
                let entries = rebuild(&chests, &catalog);
                if entries.is_empty() {
                    continue;
                }
                let entry = entries[rng.gen_range(0..entries.len())].clone();
                let before = total_of(&chests, &inventory, &entry.identity);
                let container_before: u64 = chests.iter().map(|c| count_identity(c, &entry.identity)).sum();
                let result = transfer_out(&mut chests, &mut inventory, &entry, amount, &catalog);
                assert_eq!(total_of(&chests, &inventory, &entry.identity), before);
                let container_after: u64 = chests.iter().map(|c| count_identity(c, &entry.identity)).sum();
                match result {
                    Ok(report) => assert_eq!(container_before - container_after, report.moved),
                    Err(_) => assert_eq!(container_before, container_after),
                }
            } else {
                let slot = rng.gen_range(0..inventory.num_slots());
                let Some(stack) = inventory.get_slot(slot) else { continue };
                let before = total_of(&chests, &inventory, &stack.identity);
                let preference = if rng.gen_bool(0.5) { DepositPreference::ExistingStackFirst } else { DepositPreference::FirstAvailable };
                let _ = transfer_in(&mut chests, &mut inventory, slot, amount, preference, &catalog);
                assert_eq!(total_of(&chests, &inventory, &stack.identity), before);
            }

            for container in chests.iter().chain(std::iter::once(&inventory)) {
                for stack in container.slots().iter().flatten() {
                    assert!(stack.quantity <= catalog.stack_size(&stack.identity));
                }
            }
        }
    }
}
