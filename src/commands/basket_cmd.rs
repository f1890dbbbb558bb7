//! Commands for the Whole Basket
//!
//! History, selection removal, reorder from the grid, totals and files.

use crate::basket::{BasketStore, HistoryOperations, SelectionKey, ViewRow, ViewSection};
use crate::domain::{DomainResult, Note, Totals};
use crate::repository::{BasketRepository, LoadedBasket};

/// Undo the last change; `false` when there is nothing to undo
pub fn undo(store: &mut BasketStore) -> bool {
    store.undo()
}

/// Redo the last undone change; `false` when there is nothing to redo
pub fn redo(store: &mut BasketStore) -> bool {
    store.redo()
}

/// Delete the selected sections and lines as one undo step
pub fn remove_selection(store: &mut BasketStore, keys: &[SelectionKey]) -> usize {
    store.remove_selection(keys)
}

/// Rebuild order and values from the grid after a drag and drop.
///
/// Each section carries its rows as displayed cells.
pub fn reorder_from_grid(store: &mut BasketStore, grid: &[(String, Vec<Vec<String>>)]) -> Result<(), String> {
    let view = grid
        .iter()
        .map(|(name, rows)| -> DomainResult<ViewSection> {
            let rows = rows
                .iter()
                .map(|cells| ViewRow::from_columns(cells))
                .collect::<DomainResult<Vec<_>>>()?;
            Ok(ViewSection::new(name.as_str(), rows))
        })
        .collect::<DomainResult<Vec<_>>>()
        .map_err(|e| e.to_string())?;

    store.reorder(view).map_err(|e| e.to_string())
}

/// Footer totals of the committed basket
pub fn basket_totals(store: &BasketStore) -> Totals {
    store.recompute_totals()
}

pub fn save_basket(
    repo: &dyn BasketRepository,
    store: &mut BasketStore,
    user_name: &str,
    notes: &[Note],
) -> Result<(), String> {
    repo.save(store, user_name, notes).map_err(|e| e.to_string())
}

pub fn load_basket(repo: &dyn BasketRepository) -> LoadedBasket {
    repo.load()
}
