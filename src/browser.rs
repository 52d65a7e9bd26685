//! The browser session: one open terminal over a borrowed set of containers
//! and the player inventory.

use log;
use serde::Serialize;

use crate::aggregator;
use crate::config::{BrowserConfig, TransferAmount};
use crate::entry::ItemEntry;
use crate::error::TransferError;
use crate::interaction::{hit_test, BrowserEvent, ClickKind, EditKey, HitTarget, Modifiers};
use crate::inventory_management::ItemContainer;
use crate::items::{ItemCatalog, ItemIdentity};
use crate::player_inventory::inventory_room_for;
use crate::scroll;
use crate::sorting::{self, TableViewState};
use crate::transfer::{self, TransferReport};

/// Read-only view of the table for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot<'s> {
    pub rows: &'s [ItemEntry],
    pub sort_column: &'s str,
    pub ascending: bool,
    pub scroll_offset: usize,
    pub total_rows: usize,
    pub search_text: &'s str,
    pub search_focused: bool,
    /// Handle position on the scrollbar track, 0.0 at the top
    pub handle_fraction: f32,
}

/// What handling an event did, for host feedback (sounds, tooltips).
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Ignored,
    ViewChanged,
    Transferred(TransferReport),
    TransferRejected(TransferError),
}

/// One open browser. Borrows the host's containers and inventory for its
/// lifetime; owns the aggregated entries and the view state.
pub struct StorageBrowser<'a, C: ItemContainer, I: ItemContainer + ?Sized> {
    containers: &'a mut [C],
    inventory: &'a mut I,
    catalog: &'a ItemCatalog,
    config: BrowserConfig,
    state: TableViewState,
    /// Aggregation order, before sort/filter
    entries: Vec<ItemEntry>,
    /// Sorted and filtered rows
    view: Vec<ItemEntry>,
    dirty: bool,
    search_focused: bool,
    dragging_scrollbar: bool,
    swallow_secondary_click: bool,
}

impl<'a, C: ItemContainer, I: ItemContainer + ?Sized> StorageBrowser<'a, C, I> {
    /// Starts a session. A config that fails `BrowserConfig::validate` is
    /// replaced by the defaults.
    pub fn open(containers: &'a mut [C], inventory: &'a mut I, catalog: &'a ItemCatalog, config: BrowserConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("[Browser] Rejecting config ({}), using defaults", err);
                BrowserConfig::default()
            }
        };
        let state = TableViewState::new(&config);
        let swallow_secondary_click = config.ignore_first_secondary_click;
        let mut browser = Self {
            containers,
            inventory,
            catalog,
            config,
            state,
            entries: Vec::new(),
            view: Vec::new(),
            dirty: true,
            search_focused: false,
            dragging_scrollbar: false,
            swallow_secondary_click,
        };
        browser.refresh();
        log::info!(
            "[Browser] Opened over {} containers, {} distinct items",
            browser.containers.len(),
            browser.entries.len()
        );
        browser
    }

    /// Ends the session, releasing the borrowed containers.
    pub fn close(self) {
        log::info!("[Browser] Closed with {} distinct items", self.entries.len());
    }

    // --- Derived state ---

    /// Marks the aggregate stale. The next read rebuilds it.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn refresh(&mut self) {
        if self.dirty {
            self.entries = aggregator::rebuild(&*self.containers, self.catalog);
            self.dirty = false;
        }
        self.reapply_view();
    }

    /// Re-runs sort/filter with the stored state and re-clamps the offset.
    fn reapply_view(&mut self) {
        self.view = sorting::apply(&self.entries, &self.state, &self.config.columns);
        let clamped = scroll::clamp(self.state.scroll_offset, self.view.len(), self.config.visible_rows);
        if clamped != self.state.scroll_offset {
            log::debug!("[Browser] Scroll offset {} clamped to {}", self.state.scroll_offset, clamped);
            self.state.scroll_offset = clamped;
        }
    }

    fn ensure_fresh(&mut self) {
        if self.dirty {
            self.refresh();
        }
    }

    // --- Read access ---

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn view_state(&self) -> &TableViewState {
        &self.state
    }

    /// Aggregated entries in scan order.
    pub fn entries(&mut self) -> &[ItemEntry] {
        self.ensure_fresh();
        &self.entries
    }

    /// Sorted and filtered rows.
    pub fn rows(&mut self) -> &[ItemEntry] {
        self.ensure_fresh();
        &self.view
    }

    pub fn visible_rows(&mut self) -> &[ItemEntry] {
        self.ensure_fresh();
        scroll::visible(&self.view, self.state.scroll_offset, self.config.visible_rows)
    }

    pub fn snapshot(&mut self) -> TableSnapshot<'_> {
        self.ensure_fresh();
        let total_rows = self.view.len();
        TableSnapshot {
            rows: scroll::visible(&self.view, self.state.scroll_offset, self.config.visible_rows),
            sort_column: &self.state.sort_column,
            ascending: self.state.ascending,
            scroll_offset: self.state.scroll_offset,
            total_rows,
            search_text: &self.state.search_text,
            search_focused: self.search_focused,
            handle_fraction: scroll::handle_fraction(self.state.scroll_offset, total_rows, self.config.visible_rows),
        }
    }

    pub fn inventory(&self) -> &I {
        &*self.inventory
    }

    pub fn containers(&self) -> &[C] {
        &*self.containers
    }

    /// Room the inventory still has for one identity.
    pub fn inventory_room(&self, identity: &ItemIdentity) -> u64 {
        inventory_room_for(&*self.inventory, identity, self.catalog.stack_size(identity))
    }

    // --- Sort / filter / scroll ---

    pub fn click_header(&mut self, column_id: &str) {
        sorting::toggle_sort(&mut self.state, column_id, &self.config);
        self.refresh();
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.state.search_text = text.to_string();
        self.refresh();
    }

    pub fn push_search_char(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        self.state.search_text.push(c);
        self.refresh();
        true
    }

    pub fn pop_search_char(&mut self) -> bool {
        if self.state.search_text.pop().is_none() {
            return false;
        }
        self.refresh();
        true
    }

    pub fn scroll_to(&mut self, offset: usize) {
        self.ensure_fresh();
        self.state.scroll_offset = scroll::clamp(offset, self.view.len(), self.config.visible_rows);
    }

    pub fn scroll_wheel(&mut self, ticks: i32) -> bool {
        self.ensure_fresh();
        let before = self.state.scroll_offset;
        self.state.scroll_offset = scroll::scroll_by(
            before,
            ticks,
            self.config.scroll_step,
            self.view.len(),
            self.config.visible_rows,
        );
        before != self.state.scroll_offset
    }

    fn drag_handle_to(&mut self, y: i32) {
        self.ensure_fresh();
        let track = self.config.layout.scrollbar;
        self.state.scroll_offset =
            scroll::offset_for_handle(y, track.y, track.height, self.view.len(), self.config.visible_rows);
    }

    // --- Transfers ---

    /// Moves items of the row at `row_index` (in sorted/filtered order) into the inventory.
    pub fn transfer_out(&mut self, row_index: usize, amount: TransferAmount) -> Result<TransferReport, TransferError> {
        self.ensure_fresh();
        let Some(entry) = self.view.get(row_index).cloned() else {
            log::warn!("[Browser] No row at index {}", row_index);
            return Err(TransferError::SourceEmpty);
        };
        let result = transfer::transfer_out(&mut *self.containers, &mut *self.inventory, &entry, amount, self.catalog);
        self.after_transfer(&result);
        result
    }

    /// Moves the stack in an inventory slot into the containers.
    pub fn transfer_in(&mut self, inventory_slot: usize, amount: TransferAmount) -> Result<TransferReport, TransferError> {
        let result = transfer::transfer_in(
            &mut *self.containers,
            &mut *self.inventory,
            inventory_slot,
            amount,
            self.config.deposit_preference,
            self.catalog,
        );
        self.after_transfer(&result);
        result
    }

    fn after_transfer(&mut self, result: &Result<TransferReport, TransferError>) {
        if result.is_ok() {
            self.invalidate();
            self.refresh();
        }
    }

    // --- Event dispatch ---

    fn click_amount(&self, kind: ClickKind, modifiers: Modifiers) -> TransferAmount {
        if modifiers.bulk {
            return TransferAmount::All;
        }
        match kind {
            ClickKind::Primary => self.config.primary_click,
            ClickKind::Secondary => self.config.secondary_click,
        }
    }

    pub fn handle_event(&mut self, event: BrowserEvent) -> EventOutcome {
        match event {
            BrowserEvent::Click { x, y, kind, modifiers } => self.handle_click(x, y, kind, modifiers),
            BrowserEvent::Drag { y, .. } => {
                if !self.dragging_scrollbar {
                    return EventOutcome::Ignored;
                }
                self.drag_handle_to(y);
                EventOutcome::ViewChanged
            }
            BrowserEvent::Release { .. } => {
                self.dragging_scrollbar = false;
                EventOutcome::Ignored
            }
            BrowserEvent::Wheel { ticks } => {
                if self.scroll_wheel(ticks) {
                    EventOutcome::ViewChanged
                } else {
                    EventOutcome::Ignored
                }
            }
            BrowserEvent::Text(c) => {
                if self.search_focused && self.push_search_char(c) {
                    EventOutcome::ViewChanged
                } else {
                    EventOutcome::Ignored
                }
            }
            BrowserEvent::Key(EditKey::Backspace) => {
                if self.search_focused && self.pop_search_char() {
                    EventOutcome::ViewChanged
                } else {
                    EventOutcome::Ignored
                }
            }
            BrowserEvent::Key(EditKey::Escape) => {
                if !self.search_focused {
                    return EventOutcome::Ignored;
                }
                self.search_focused = false;
                EventOutcome::ViewChanged
            }
        }
    }

    fn handle_click(&mut self, x: i32, y: i32, kind: ClickKind, modifiers: Modifiers) -> EventOutcome {
        if kind == ClickKind::Secondary && self.swallow_secondary_click {
            self.swallow_secondary_click = false;
            log::debug!("[Browser] Ignoring first secondary click after open");
            return EventOutcome::Ignored;
        }

        self.ensure_fresh();
        let visible_count =
            scroll::visible(&self.view, self.state.scroll_offset, self.config.visible_rows).len();
        let target = hit_test(
            &self.config,
            self.inventory.num_slots(),
            self.state.scroll_offset,
            visible_count,
            x,
            y,
        );

        if kind == ClickKind::Primary {
            self.search_focused = target == HitTarget::SearchBox;
        }

        let amount = self.click_amount(kind, modifiers);
        let result = match (target, kind) {
            (HitTarget::InventorySlot(slot), _) => {
                if self.inventory.get_slot(slot).is_none() {
                    return EventOutcome::Ignored;
                }
                self.transfer_in(slot, amount)
            }
            (HitTarget::TableRow(row), _) => self.transfer_out(row, amount),
            (HitTarget::ColumnHeader(id), ClickKind::Primary) => {
                self.click_header(&id);
                return EventOutcome::ViewChanged;
            }
            (HitTarget::Scrollbar, ClickKind::Primary) => {
                self.dragging_scrollbar = true;
                self.drag_handle_to(y);
                return EventOutcome::ViewChanged;
            }
            (HitTarget::SearchBox, ClickKind::Primary) => return EventOutcome::ViewChanged,
            _ => return EventOutcome::Ignored,
        };

        match result {
            Ok(report) => EventOutcome::Transferred(report),
            Err(err) => {
                log::info!("[Browser] Transfer rejected: {}", err);
                EventOutcome::TransferRejected(err)
            }
        }
    }
}
