use std::cmp::Ordering;
use log;
use serde::Serialize;

use crate::config::{BrowserConfig, ColumnConfig, SortKey};
use crate::entry::ItemEntry;

/// Per-session table state. Owned by the session and handed to the engine
/// functions below; nothing here is global.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableViewState {
    pub sort_column: String,
    pub ascending: bool,
    /// Raw text as typed. See `search_predicate` for what is matched.
    pub search_text: String,
    pub scroll_offset: usize,
}

impl TableViewState {
    /// Fresh state for a new session: default column ascending, no filter, top of list.
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            sort_column: config.default_sort_column.clone(),
            ascending: true,
            search_text: String::new(),
            scroll_offset: 0,
        }
    }

    /// Lowercased predicate with leading invisible whitespace removed.
    pub fn search_predicate(&self) -> String {
        normalize_search(&self.search_text)
    }
}

fn is_invisible_lead(c: char) -> bool {
    // char::is_whitespace already covers U+00A0
    c.is_whitespace() || matches!(c, '\u{200B}' | '\u{2060}' | '\u{FEFF}')
}

pub fn normalize_search(raw: &str) -> String {
    raw.trim_start_matches(is_invisible_lead).to_lowercase()
}

/// Column id used when a requested sort column does not exist: the first
/// name-keyed column, or the default column if none is configured.
fn fallback_column(config: &BrowserConfig) -> String {
    config
        .columns
        .iter()
        .find(|c| c.key == SortKey::Name)
        .map(|c| c.id.clone())
        .unwrap_or_else(|| config.default_sort_column.clone())
}

/// Header-click transition. Same column flips direction, another known
/// column is selected ascending. Unknown ids fall back to name ascending.
pub fn toggle_sort(state: &mut TableViewState, column_id: &str, config: &BrowserConfig) {
    if config.column(column_id).is_none() {
        let fallback = fallback_column(config);
        log::warn!("[Sort] Unknown sort column '{}', falling back to '{}' ascending", column_id, fallback);
        state.sort_column = fallback;
        state.ascending = true;
        return;
    }
    if state.sort_column == column_id {
        state.ascending = !state.ascending;
    } else {
        state.sort_column = column_id.to_string();
        state.ascending = true;
    }
    log::debug!(
        "[Sort] Sorting by '{}' {}",
        state.sort_column,
        if state.ascending { "ascending" } else { "descending" }
    );
}

fn compare_names(a: &ItemEntry, b: &ItemEntry) -> Ordering {
    a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase())
}

fn compare_primary(key: SortKey, a: &ItemEntry, b: &ItemEntry) -> Ordering {
    match key {
        SortKey::Name => compare_names(a, b),
        SortKey::Quantity => a.total_quantity.cmp(&b.total_quantity),
        SortKey::Category => a
            .category
            .name()
            .to_lowercase()
            .cmp(&b.category.name().to_lowercase()),
    }
}

fn resolve_key<'c>(columns: &'c [ColumnConfig], state: &TableViewState) -> Option<&'c ColumnConfig> {
    columns.iter().find(|c| c.id == state.sort_column)
}

/// Filters and orders entries for display.
///
/// Ties on the selected column fall back to name ascending regardless of
/// direction; anything still tied keeps its aggregation order.
pub fn apply(entries: &[ItemEntry], state: &TableViewState, columns: &[ColumnConfig]) -> Vec<ItemEntry> {
    let needle = state.search_predicate();
    let mut view: Vec<ItemEntry> = entries.iter().filter(|e| e.matches(&needle)).cloned().collect();

    let (key, ascending) = match resolve_key(columns, state) {
        Some(column) => (column.key, state.ascending),
        None => {
            log::warn!("[Sort] Unknown sort column '{}', using name ascending", state.sort_column);
            (SortKey::Name, true)
        }
    };

    view.sort_by(|a, b| {
        let primary = compare_primary(key, a, b);
        let primary = if ascending { primary } else { primary.reverse() };
        primary.then_with(|| compare_names(a, b))
    });

    log::debug!(
        "[Sort] {} of {} entries match '{}'",
        view.len(),
        entries.len(),
        needle
    );
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemCategory, ItemIdentity};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn entry(def_id: u64, name: &str, category: ItemCategory, qty: u64) -> ItemEntry {
        let mut e = ItemEntry::new(ItemIdentity::new(def_id), name.to_string(), category);
        e.total_quantity = qty;
        e
    }

    fn sample() -> Vec<ItemEntry> {
        vec![
            entry(1, "wood", ItemCategory::Material, 30),
            entry(2, "Stone", ItemCategory::Material, 5),
            entry(3, "Acorn", ItemCategory::Misc, 30),
            entry(4, "Parsnip", ItemCategory::Crop, 12),
        ]
    }

    fn names(view: &[ItemEntry]) -> Vec<&str> {
        view.iter().map(|e| e.display_name.as_str()).collect()
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let config = BrowserConfig::default();
        let state = TableViewState::new(&config);
        let view = apply(&sample(), &state, &config.columns);
        assert_eq!(names(&view), vec!["Acorn", "Parsnip", "Stone", "wood"]);
    }

    #[test]
    fn test_quantity_ties_break_by_name_in_both_directions() {
        let config = BrowserConfig::default();
        let mut state = TableViewState::new(&config);
        state.sort_column = "quantity".to_string();
        let view = apply(&sample(), &state, &config.columns);
        assert_eq!(names(&view), vec!["Stone", "Parsnip", "Acorn", "wood"]);

        state.ascending = false;
        let view = apply(&sample(), &state, &config.columns);
        assert_eq!(names(&view), vec!["Acorn", "wood", "Parsnip", "Stone"]);
    }

    #[test]
    fn test_category_sort() {
        let config = BrowserConfig::default();
        let mut state = TableViewState::new(&config);
        toggle_sort(&mut state, "category", &config);
        let view = apply(&sample(), &state, &config.columns);
        assert_eq!(names(&view), vec!["Parsnip", "Stone", "wood", "Acorn"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let config = BrowserConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let entries: Vec<ItemEntry> = (0..40)
            .map(|i| entry(i, &format!("Item {}", rng.gen_range(0..10)), ItemCategory::Misc, rng.gen_range(1..5)))
            .collect();
        for column in ["name", "quantity", "category"] {
            for ascending in [true, false] {
                let mut state = TableViewState::new(&config);
                state.sort_column = column.to_string();
                state.ascending = ascending;
                let once = apply(&entries, &state, &config.columns);
                let twice = apply(&once, &state, &config.columns);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_filter_matches_exactly_the_containing_entries() {
        let config = BrowserConfig::default();
        let entries = sample();
        for predicate in ["", "o", "ST", "\u{a0}\u{a0}wOo", "zzz", "n"] {
            let mut state = TableViewState::new(&config);
            state.search_text = predicate.to_string();
            let needle = normalize_search(predicate);
            let view = apply(&entries, &state, &config.columns);
            for e in &entries {
                let included = view.iter().any(|v| v.identity == e.identity);
                assert_eq!(included, e.display_name.to_lowercase().contains(&needle), "predicate {:?}", predicate);
            }
        }
    }

    #[test]
    fn test_leading_invisible_whitespace_is_stripped() {
        assert_eq!(normalize_search("\u{a0} \u{200B}Stone "), "stone ");
    }

    #[test]
    fn test_header_toggle_protocol() {
        let config = BrowserConfig::default();
        let mut state = TableViewState::new(&config);
        toggle_sort(&mut state, "quantity", &config);
        assert_eq!((state.sort_column.as_str(), state.ascending), ("quantity", true));
        toggle_sort(&mut state, "quantity", &config);
        assert_eq!((state.sort_column.as_str(), state.ascending), ("quantity", false));
        toggle_sort(&mut state, "name", &config);
        assert_eq!((state.sort_column.as_str(), state.ascending), ("name", true));
        toggle_sort(&mut state, "name", &config);
        toggle_sort(&mut state, "name", &config);
        assert_eq!((state.sort_column.as_str(), state.ascending), ("name", true));
    }

    #[test]
    fn test_unknown_column_falls_back_to_name_ascending() {
        let config = BrowserConfig::default();
        let mut state = TableViewState::new(&config);
        toggle_sort(&mut state, "quantity", &config);
        toggle_sort(&mut state, "weight", &config);
        assert_eq!((state.sort_column.as_str(), state.ascending), ("name", true));

        state.sort_column = "weight".to_string();
        state.ascending = false;
        let view = apply(&sample(), &state, &config.columns);
        assert_eq!(names(&view), vec!["Acorn", "Parsnip", "Stone", "wood"]);
    }

    #[test]
    fn test_unknown_column_ignores_non_name_default() {
        let config = BrowserConfig { default_sort_column: "quantity".to_string(), ..BrowserConfig::default() };
        assert!(config.validate().is_ok());
        let mut state = TableViewState::new(&config);
        toggle_sort(&mut state, "quantity", &config);
        assert!(!state.ascending);
        toggle_sort(&mut state, "weight", &config);
        assert_eq!((state.sort_column.as_str(), state.ascending), ("name", true));
    }
}
