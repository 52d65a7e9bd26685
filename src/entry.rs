use serde::Serialize;

use crate::items::{ItemCategory, ItemIdentity};

/// Where part of an entry's quantity lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub container_index: usize,
    pub slot_index: usize,
    pub quantity: u32,
}

/// One row of the aggregate table: every stack of one identity across all
/// containers, summed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemEntry {
    pub identity: ItemIdentity,
    pub display_name: String,
    pub category: ItemCategory,
    /// Always equal to the sum over `sources`, and never zero
    pub total_quantity: u64,
    /// In container-then-slot scan order
    pub sources: Vec<SourceLocation>,
}

impl ItemEntry {
    pub(crate) fn new(identity: ItemIdentity, display_name: String, category: ItemCategory) -> Self {
        Self {
            identity,
            display_name,
            category,
            total_quantity: 0,
            sources: Vec::new(),
        }
    }

    pub(crate) fn add_source(&mut self, location: SourceLocation) {
        self.total_quantity += location.quantity as u64;
        self.sources.push(location);
    }

    /// Whether the display name contains `needle`, which must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.display_name.to_lowercase().contains(needle)
    }
}
