// Storage terminal: one sortable, searchable table over many storage
// containers, with transfers to and from the player inventory.

// Item definitions, identities and stack math
pub mod items;
// Slot-level container trait and helpers
pub mod inventory_management;
pub mod player_inventory;
pub mod chest;
// Aggregate table
pub mod entry;
pub mod aggregator;
pub mod sorting;
pub mod scroll;
pub mod transfer;
// Session, input boundary, configuration
pub mod browser;
pub mod interaction;
pub mod config;
pub mod error;

pub use browser::{EventOutcome, StorageBrowser, TableSnapshot};
pub use chest::{Chest, NUM_CHEST_SLOTS, NUM_INVENTORY_SLOTS};
pub use config::{BrowserConfig, ColumnConfig, DepositPreference, LayoutConfig, SortKey, TransferAmount};
pub use entry::{ItemEntry, SourceLocation};
pub use error::{ConfigError, TransferError};
pub use interaction::{BrowserEvent, ClickKind, EditKey, HitTarget, Modifiers, Rect};
pub use inventory_management::{count_identity, is_container_empty, ItemContainer};
pub use items::{ItemCatalog, ItemCategory, ItemDefinition, ItemIdentity, ItemStack};
pub use sorting::TableViewState;
pub use transfer::{TransferDirection, TransferReport};
