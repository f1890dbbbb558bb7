//! Basket Layer
//!
//! The in-memory ledger of one open project and the operations on it.
//! Operation groups are traits implemented on [`BasketStore`], so callers
//! import only what they use.

mod history;
mod overrides;
mod store;
mod view;


pub use history::{History, HistoryOperations};
pub use overrides::{CoefficientAxis, CoefficientOverrideOperations};
pub use store::{BasketStore, LedgerState, SelectionKey};
pub use view::{ExportRow, ItemView, SectionView, ViewRow, ViewSection, DISPLAY_COLUMNS};
