use std::collections::HashMap;
use log;
use serde::{Deserialize, Serialize};

// --- Constants ---

/// Stack ceiling used when an identity has no definition in the catalog.
pub const DEFAULT_STACK_SIZE: u32 = 999;

// --- Item Enums and Structs ---

// Categories shown in the table's category column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Tool,
    Material,
    Placeable,
    Resource,
    Crop,
    Cooking,
    Misc,
}

impl ItemCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Tool => "Tool",
            ItemCategory::Material => "Material",
            ItemCategory::Placeable => "Placeable",
            ItemCategory::Resource => "Resource",
            ItemCategory::Crop => "Crop",
            ItemCategory::Cooking => "Cooking",
            ItemCategory::Misc => "Misc",
        }
    }
}

/// The merge key for items. Two stacks with equal identity collapse into one
/// table row; anything else stays separate even when the names match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemIdentity {
    pub def_id: u64,
    pub quality: u8,
}

impl ItemIdentity {
    pub fn new(def_id: u64) -> Self {
        Self { def_id, quality: 0 }
    }

    pub fn with_quality(def_id: u64, quality: u8) -> Self {
        Self { def_id, quality }
    }
}

/// Contents of one occupied slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub identity: ItemIdentity,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(identity: ItemIdentity, quantity: u32) -> Self {
        Self { identity, quantity }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: u64,
    pub name: String,
    pub category: ItemCategory,
    pub is_stackable: bool, // Can more than one unit share a slot?
    pub stack_size: u32,    // Max number per stack (if stackable)
}

impl ItemDefinition {
    /// Effective per-slot ceiling. Non-stackable items always cap at 1.
    pub fn max_stack(&self) -> u32 {
        if self.is_stackable {
            self.stack_size.max(1)
        } else {
            1
        }
    }
}

// --- Item Catalog ---

/// Definition table shared by every container and the inventory. Names,
/// categories and stack ceilings are looked up here by `def_id`.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
    definitions: HashMap<u64, ItemDefinition>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the basic materials and tools.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        let initial_items = vec![
            (1, "Wood", ItemCategory::Material, true, 999),
            (2, "Stone", ItemCategory::Material, true, 999),
            (3, "Fiber", ItemCategory::Material, true, 999),
            (4, "Copper Ore", ItemCategory::Resource, true, 999),
            (5, "Iron Ore", ItemCategory::Resource, true, 999),
            (6, "Parsnip", ItemCategory::Crop, true, 999),
            (7, "Fried Egg", ItemCategory::Cooking, true, 999),
            (8, "Stone Hatchet", ItemCategory::Tool, false, 1),
            (9, "Stone Pickaxe", ItemCategory::Tool, false, 1),
            (10, "Chest", ItemCategory::Placeable, true, 999),
        ];
        for (id, name, category, is_stackable, stack_size) in initial_items {
            catalog.insert(ItemDefinition {
                id,
                name: name.to_string(),
                category,
                is_stackable,
                stack_size,
            });
        }
        log::debug!("[ItemCatalog] Seeded {} item definitions.", catalog.len());
        catalog
    }

    /// Adds or replaces a definition, returning the previous one if any.
    pub fn insert(&mut self, definition: ItemDefinition) -> Option<ItemDefinition> {
        self.definitions.insert(definition.id, definition)
    }

    pub fn get(&self, def_id: u64) -> Option<&ItemDefinition> {
        self.definitions.get(&def_id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn display_name(&self, identity: &ItemIdentity) -> String {
        match self.get(identity.def_id) {
            Some(def) => def.name.clone(),
            None => format!("Unknown Item #{}", identity.def_id),
        }
    }

    pub fn category(&self, identity: &ItemIdentity) -> ItemCategory {
        self.get(identity.def_id)
            .map(|def| def.category)
            .unwrap_or(ItemCategory::Misc)
    }

    /// Per-identity stack ceiling used for every container and the inventory.
    pub fn stack_size(&self, identity: &ItemIdentity) -> u32 {
        self.get(identity.def_id)
            .map(ItemDefinition::max_stack)
            .unwrap_or(DEFAULT_STACK_SIZE)
    }
}

// --- Merge Helper ---

/// Result of pouring `source_qty` units onto an existing stack of `target_qty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeResult {
    pub transferred: u32,
    pub source_remaining: u32,
    pub target_new_qty: u32,
}

/// Computes how much of a source quantity fits onto a target stack.
/// Returns None when nothing can be transferred (target full or source empty).
pub fn calculate_merge_result(source_qty: u32, target_qty: u32, stack_size: u32) -> Option<MergeResult> {
    let space_available = stack_size.saturating_sub(target_qty);
    if space_available == 0 || source_qty == 0 {
        return None;
    }
    let transferred = source_qty.min(space_available);
    Some(MergeResult {
        transferred,
        source_remaining: source_qty - transferred,
        target_new_qty: target_qty + transferred,
    })
}
