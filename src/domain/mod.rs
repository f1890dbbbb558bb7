//! Domain Layer
//!
//! Ledger entities, pricing rules and the shared error type.
//! Nothing here knows about history or files.

mod entity;
mod item;
mod note;
mod pricing;
mod section;

pub use entity::{DomainError, DomainResult, Entity, NamedEntity};
pub use item::{check_amount, parse_amount, parse_quantity, BasketItem, CatalogRow, ItemEdit, ItemKey, ProductLine};
pub use note::Note;
pub use pricing::{format_amount, price_item, recompute_totals, AxisPricing, ItemPricing, Totals};
pub use section::{index_of, Section};
