//! Input boundary. The host captures raw device input and hands the browser
//! resolved, discrete events; this module turns screen positions into the
//! table, inventory or control they landed on.

use serde::{Deserialize, Serialize};

use crate::config::{BrowserConfig, ColumnConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let (left, top) = (i64::from(self.x), i64::from(self.y));
        x >= left && x < left + i64::from(self.width) && y >= top && y < top + i64::from(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Held bulk-transfer modifier (shift)
    pub bulk: bool,
}

/// Keys that edit the search text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Backspace,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    Click { x: i32, y: i32, kind: ClickKind, modifiers: Modifiers },
    /// Pointer moved while the primary button is held
    Drag { x: i32, y: i32 },
    Release { x: i32, y: i32 },
    /// Positive ticks scroll up
    Wheel { ticks: i32 },
    Text(char),
    Key(EditKey),
}

/// What a screen position resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    InventorySlot(usize),
    /// Index into the sorted/filtered rows, offset already applied
    TableRow(usize),
    ColumnHeader(String),
    SearchBox,
    Scrollbar,
    Nothing,
}

fn header_at(columns: &[ColumnConfig], table_x: i32, header_y: i32, row_height: i32, x: i32, y: i32) -> Option<&ColumnConfig> {
    let mut left = table_x;
    for column in columns {
        if Rect::new(left, header_y, column.width, row_height).contains(x, y) {
            return Some(column);
        }
        left += column.width;
    }
    None
}

/// Resolves a position against the configured layout.
///
/// `visible_count` is the length of the current visible slice and
/// `offset` the scroll offset it starts at, so a row hit maps straight to a
/// row index of the full view.
pub fn hit_test(config: &BrowserConfig, inventory_slots: usize, offset: usize, visible_count: usize, x: i32, y: i32) -> HitTarget {
    let layout = &config.layout;

    // --- Inventory grid ---
    let per_row = layout.inventory_slots_per_row.max(1);
    for slot in 0..inventory_slots {
        let col = (slot % per_row) as i32;
        let row = (slot / per_row) as i32;
        let rect = Rect::new(
            layout.inventory_x + col * layout.inventory_slot_size,
            layout.inventory_y + row * layout.inventory_slot_size,
            layout.inventory_slot_size,
            layout.inventory_slot_size,
        );
        if rect.contains(x, y) {
            return HitTarget::InventorySlot(slot);
        }
    }

    if layout.search_box.contains(x, y) {
        return HitTarget::SearchBox;
    }
    if layout.scrollbar.contains(x, y) {
        return HitTarget::Scrollbar;
    }

    if let Some(column) = header_at(&config.columns, layout.table_x, layout.header_y, layout.row_height, x, y) {
        return HitTarget::ColumnHeader(column.id.clone());
    }

    // --- Table rows, directly under the header ---
    let rows_top = layout.header_y + layout.row_height;
    for i in 0..visible_count.min(config.visible_rows) {
        let rect = Rect::new(layout.table_x, rows_top + layout.row_height * i as i32, layout.row_width, layout.row_height);
        if rect.contains(x, y) {
            return HitTarget::TableRow(offset + i);
        }
    }

    HitTarget::Nothing
}
