use std::collections::HashMap;
use log;

use crate::entry::{ItemEntry, SourceLocation};
use crate::inventory_management::{occupied_slot, ItemContainer};
use crate::items::{ItemCatalog, ItemIdentity};

/// Scans every slot of every container, in container-then-slot order, and
/// merges stacks of equal identity into one entry.
///
/// The result is ordered by first sighting, so an unchanged container set
/// always produces the same list. Containers are only read.
pub fn rebuild<C: ItemContainer>(containers: &[C], catalog: &ItemCatalog) -> Vec<ItemEntry> {
    let mut entries: Vec<ItemEntry> = Vec::new();
    let mut index_by_identity: HashMap<ItemIdentity, usize> = HashMap::new();
    let mut slots_scanned = 0usize;

    for (container_index, container) in containers.iter().enumerate() {
        for slot_index in 0..container.num_slots() {
            slots_scanned += 1;
            // Zero-quantity stacks count as empty
            let Some(stack) = occupied_slot(container, slot_index) else {
                continue;
            };
            let entry_index = *index_by_identity.entry(stack.identity).or_insert_with(|| {
                entries.push(ItemEntry::new(
                    stack.identity,
                    catalog.display_name(&stack.identity),
                    catalog.category(&stack.identity),
                ));
                entries.len() - 1
            });
            entries[entry_index].add_source(SourceLocation {
                container_index,
                slot_index,
                quantity: stack.quantity,
            });
        }
    }

    log::debug!(
        "[Aggregator] Rebuilt {} entries from {} slots across {} containers",
        entries.len(),
        slots_scanned,
        containers.len()
    );
    entries
}
