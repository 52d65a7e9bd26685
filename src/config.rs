//! Configuration for a browser session.
//!
//! Everything has a default, so hosts can deserialize a partial JSON document
//! and only override what they care about.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::interaction::Rect;

/// Comparator a table column sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Display name, case-insensitive
    Name,
    /// Total quantity across all containers
    Quantity,
    /// Category name, case-insensitive
    Category,
}

/// One sortable column of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Stable id used for header clicks and the view state
    pub id: String,
    /// Header text
    pub title: String,
    pub key: SortKey,
    /// Header width in pixels, used for hit-testing
    pub width: i32,
}

impl ColumnConfig {
    pub fn new(id: &str, title: &str, key: SortKey, width: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            key,
            width,
        }
    }
}

/// How much a non-bulk or bulk click moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferAmount {
    /// A single unit
    OneUnit,
    /// One stack, capped by the item's stack size
    FullStack,
    /// Everything available of that identity
    All,
}

/// Slot selection order when moving items from the inventory into containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DepositPreference {
    /// Top up matching stacks, then empty slots in containers already holding
    /// the item, then any empty slot
    #[default]
    ExistingStackFirst,
    /// First slot with any room, in container-then-slot order
    FirstAvailable,
}

/// Screen geometry of the terminal, relative to the host's coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Left edge of the table rows (and of the first column header)
    pub table_x: i32,
    /// Top edge of the column header row
    pub header_y: i32,
    pub row_height: i32,
    pub row_width: i32,
    pub search_box: Rect,
    pub scrollbar: Rect,
    pub inventory_x: i32,
    pub inventory_y: i32,
    pub inventory_slot_size: i32,
    pub inventory_slots_per_row: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            table_x: 20,
            header_y: 110,
            row_height: 32,
            row_width: 740,
            search_box: Rect::new(30, 20, 200, 48),
            scrollbar: Rect::new(790, 120, 24, 384),
            inventory_x: 31,
            inventory_y: 675,
            inventory_slot_size: 64,
            inventory_slots_per_row: 12,
        }
    }
}

fn default_columns() -> Vec<ColumnConfig> {
    vec![
        ColumnConfig::new("name", "Name", SortKey::Name, 440),
        ColumnConfig::new("quantity", "Quantity", SortKey::Quantity, 150),
        ColumnConfig::new("category", "Category", SortKey::Category, 150),
    ]
}

/// Browser session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Rows shown at once
    pub visible_rows: usize,
    /// Rows moved per wheel tick
    pub scroll_step: usize,
    pub columns: Vec<ColumnConfig>,
    /// Column selected when a session opens, and the fallback for unknown ids
    pub default_sort_column: String,
    /// Amount moved by a primary click without the bulk modifier
    pub primary_click: TransferAmount,
    /// Amount moved by a secondary click without the bulk modifier
    pub secondary_click: TransferAmount,
    pub deposit_preference: DepositPreference,
    /// Swallow the first secondary click after opening
    pub ignore_first_secondary_click: bool,
    pub layout: LayoutConfig,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            visible_rows: 12,
            scroll_step: 1,
            columns: default_columns(),
            default_sort_column: "name".to_string(),
            primary_click: TransferAmount::OneUnit,
            secondary_click: TransferAmount::FullStack,
            deposit_preference: DepositPreference::default(),
            ignore_first_secondary_click: true,
            layout: LayoutConfig::default(),
        }
    }
}

impl BrowserConfig {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!("[Config] Loaded browser config with {} columns", config.columns.len());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.visible_rows == 0 {
            return Err(ConfigError::invalid("visible_rows must be at least 1"));
        }
        if self.scroll_step == 0 {
            return Err(ConfigError::invalid("scroll_step must be at least 1"));
        }
        if self.columns.is_empty() {
            return Err(ConfigError::invalid("at least one column is required"));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.id.as_str()) {
                return Err(ConfigError::invalid(format!("duplicate column id '{}'", column.id)));
            }
        }
        if self.column(&self.default_sort_column).is_none() {
            return Err(ConfigError::invalid(format!(
                "default sort column '{}' is not a configured column",
                self.default_sort_column
            )));
        }
        if self.layout.inventory_slots_per_row == 0 {
            return Err(ConfigError::invalid("inventory_slots_per_row must be at least 1"));
        }
        Ok(())
    }

    pub fn column(&self, id: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.id == id)
    }
}
