//! Basket Store - Core Ledger Operations
//!
//! Owns the ordered sections and their lines, the add-time originals used by
//! `reset_item`, and the undo history. Specialized operations live in
//! separate modules:
//! - overrides: bulk coefficient apply/revert
//! - history: undo/redo
//! - view: rendering traversal, reorder input, export rows

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::config::LedgerConfig;
use crate::domain::{
    index_of, recompute_totals, BasketItem, CatalogRow, DomainError, DomainResult, ItemEdit, ItemKey, Section,
    Totals,
};

use super::history::{HistoryOperations, LedgerHistory};
use super::view::ViewSection;

/// Everything a snapshot captures
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerState {
    /// Sections in display order
    pub sections: Vec<Section>,
    /// Material coefficients recorded before the first bulk override
    pub base_material: BTreeMap<ItemKey, f64>,
    /// Labor coefficients recorded before the first bulk override
    pub base_work: BTreeMap<ItemKey, f64>,
}

impl LedgerState {
    pub(super) fn item_mut(&mut self, key: &ItemKey) -> Option<&mut BasketItem> {
        let idx = index_of(&self.sections, &key.section)?;
        self.sections[idx].get_mut(&key.produkt)
    }
}

/// Selected row in the basket grid: a whole section or one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionKey {
    Section(String),
    Item(ItemKey),
}

/// The basket ledger of one open project
#[derive(Debug)]
pub struct BasketStore {
    pub(super) state: LedgerState,
    pub(super) originals: HashMap<ItemKey, BasketItem>,
    pub(super) history: LedgerHistory,
    pub(super) modified: bool,
    config: LedgerConfig,
}

impl Default for BasketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BasketStore {
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        Self {
            state: LedgerState::default(),
            originals: HashMap::new(),
            history: LedgerHistory::new(config.history_limit),
            modified: false,
            config,
        }
    }

    /// Build a store around sections read from disk.
    ///
    /// The loaded lines become the originals for `reset_item`; history is empty.
    pub fn from_sections(sections: Vec<Section>, config: LedgerConfig) -> Self {
        let mut store = Self::with_config(config);
        for section in &sections {
            for (produkt, item) in section.iter() {
                store
                    .originals
                    .insert(ItemKey::new(&section.name, produkt), item.clone());
            }
        }
        store.state.sections = sections;
        store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Committed state, including both base-coefficient maps
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn sections(&self) -> &[Section] {
        &self.state.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        index_of(&self.state.sections, name).map(|i| &self.state.sections[i])
    }

    pub fn get(&self, section: &str, produkt: &str) -> Option<&BasketItem> {
        self.section(section).and_then(|s| s.get(produkt))
    }

    pub fn contains(&self, section: &str, produkt: &str) -> bool {
        self.get(section, produkt).is_some()
    }

    pub fn item_count(&self) -> usize {
        self.state.sections.iter().map(Section::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Values captured when the line was first added
    pub fn original(&self, section: &str, produkt: &str) -> Option<&BasketItem> {
        self.originals.get(&ItemKey::new(section, produkt))
    }

    /// Unsaved changes since the last save or load
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn recompute_totals(&self) -> Totals {
        recompute_totals(&self.state.sections)
    }

    fn resolve_section(&self, row: &CatalogRow, section: Option<&str>) -> String {
        section
            .map(str::to_string)
            .or_else(|| row.section.clone())
            .unwrap_or_else(|| self.config.default_section.clone())
    }

    /// Add a catalog row to the basket.
    ///
    /// Returns `false` without touching the ledger (or its history) when the
    /// product already exists in the section or the row is not a valid line.
    pub fn add_item(&mut self, row: CatalogRow, section: Option<&str>) -> bool {
        let section = self.resolve_section(&row, section);
        let item = row.to_item();

        if row.produkt.trim().is_empty() {
            warn!("add_item: empty product name rejected");
            return false;
        }
        if let Err(e) = item.validate() {
            warn!("add_item {}/{} rejected: {}", section, row.produkt, e);
            return false;
        }
        if self.contains(&section, &row.produkt) {
            debug!("add_item {}/{}: already in basket", section, row.produkt);
            return false;
        }

        self.snapshot();
        self.insert_line(&section, &row.produkt, item);
        debug!("add_item {}/{}", section, row.produkt);
        true
    }

    /// Add a manually entered line. A taken name gets a ` (2)`, ` (3)`, ... suffix.
    ///
    /// Returns the name the line was stored under.
    pub fn add_custom_item(&mut self, row: CatalogRow, section: Option<&str>) -> DomainResult<String> {
        let section = self.resolve_section(&row, section);
        let base = row.produkt.trim().to_string();
        if base.is_empty() {
            return Err(DomainError::InvalidInput("product name cannot be empty".to_string()));
        }
        let item = row.to_item();
        item.validate()?;

        let mut name = base.clone();
        let mut counter = 1;
        while self.contains(&section, &name) {
            counter += 1;
            name = format!("{} ({})", base, counter);
        }

        self.snapshot();
        self.insert_line(&section, &name, item);
        debug!("add_custom_item {}/{}", section, name);
        Ok(name)
    }

    fn insert_line(&mut self, section: &str, produkt: &str, item: BasketItem) {
        self.originals
            .insert(ItemKey::new(section, produkt), item.clone());

        let idx = match index_of(&self.state.sections, section) {
            Some(idx) => idx,
            None => {
                self.state.sections.push(Section::new(section));
                self.state.sections.len() - 1
            }
        };
        self.state.sections[idx].upsert(produkt, item);
    }

    /// Edit one field of a line. Invalid values are rejected before any change.
    pub fn update_item(&mut self, section: &str, produkt: &str, edit: ItemEdit) -> DomainResult<()> {
        edit.validate()?;
        if !self.contains(section, produkt) {
            return Err(DomainError::NotFound(format!("{}/{}", section, produkt)));
        }

        self.snapshot();
        if let Some(item) = self.state.item_mut(&ItemKey::new(section, produkt)) {
            debug!("update_item {}/{}: {:?}", section, produkt, edit);
            edit.apply_to(item);
        }
        Ok(())
    }

    /// Remove one line; an emptied section disappears with it
    pub fn remove(&mut self, section: &str, produkt: &str) {
        if !self.contains(section, produkt) {
            return;
        }

        self.snapshot();
        self.remove_line(section, produkt);
        debug!("remove {}/{}", section, produkt);
    }

    fn remove_line(&mut self, section: &str, produkt: &str) -> bool {
        let Some(idx) = index_of(&self.state.sections, section) else {
            return false;
        };
        let removed = self.state.sections[idx].remove(produkt).is_some();
        if self.state.sections[idx].is_empty() {
            self.state.sections.remove(idx);
        }
        removed
    }

    fn selection_matches(&self, key: &SelectionKey) -> bool {
        match key {
            SelectionKey::Section(name) => self.section(name).is_some(),
            SelectionKey::Item(k) => self.contains(&k.section, &k.produkt),
        }
    }

    /// Remove a batch of sections and lines under a single undo step.
    ///
    /// Returns how many keys removed something.
    pub fn remove_selection(&mut self, keys: &[SelectionKey]) -> usize {
        if !keys.iter().any(|k| self.selection_matches(k)) {
            return 0;
        }

        self.snapshot();
        let mut removed = 0;
        for key in keys {
            let hit = match key {
                SelectionKey::Section(name) => match index_of(&self.state.sections, name) {
                    Some(idx) => {
                        self.state.sections.remove(idx);
                        true
                    }
                    None => false,
                },
                SelectionKey::Item(k) => self.remove_line(&k.section, &k.produkt),
            };
            if hit {
                removed += 1;
            }
        }
        debug!("remove_selection: {} of {} keys", removed, keys.len());
        removed
    }

    /// Replace order and values with a structure rebuilt from the rendered grid.
    ///
    /// The grid has no supplier or link columns, so `dodavatel` and `odkaz`
    /// of every line come back empty.
    pub fn reorder(&mut self, view: Vec<ViewSection>) -> DomainResult<()> {
        for section in &view {
            for row in &section.rows {
                row.to_item().validate()?;
            }
        }

        let mut sections: Vec<Section> = Vec::with_capacity(view.len());
        for view_section in view {
            let mut section = Section::new(view_section.name.as_str());
            for row in &view_section.rows {
                section.upsert(&row.produkt, row.to_item());
            }
            match index_of(&sections, &view_section.name) {
                Some(idx) => sections[idx] = section,
                None => sections.push(section),
            }
        }

        self.snapshot();
        self.state.sections = sections;
        debug!("reorder: {} sections", self.state.sections.len());
        Ok(())
    }

    /// Put a line back to the values it had when it was added.
    ///
    /// `false` when the line or its original is unknown.
    pub fn reset_item(&mut self, section: &str, produkt: &str) -> bool {
        let key = ItemKey::new(section, produkt);
        let Some(original) = self.originals.get(&key).cloned() else {
            return false;
        };
        if !self.contains(section, produkt) {
            return false;
        }

        self.snapshot();
        if let Some(item) = self.state.item_mut(&key) {
            *item = original;
        }
        debug!("reset_item {}", key);
        true
    }
}
