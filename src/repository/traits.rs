//! Repository Layer - Core Traits
//!
//! Storage seam for a whole basket. The JSON file is the only backend today;
//! tests and callers can substitute their own.

use crate::basket::BasketStore;
use crate::domain::{DomainResult, Note};

use super::basket_io::LoadedBasket;

/// Where a basket document is kept
pub trait BasketRepository {
    /// Persist the basket; clears its modified flag on success
    fn save(&self, basket: &mut BasketStore, user_name: &str, notes: &[Note]) -> DomainResult<()>;

    /// Read the basket back. Never fails: unreadable storage gives an empty basket.
    fn load(&self) -> LoadedBasket;
}
