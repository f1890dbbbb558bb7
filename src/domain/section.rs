//! Section Entity
//!
//! A named, ordered group of product lines. Line order is insertion order
//! unless the user reorders the basket.

use super::entity::{Entity, NamedEntity};
use super::item::{BasketItem, ProductLine};

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub lines: Vec<ProductLine>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, produkt: &str) -> Option<&BasketItem> {
        index_of(&self.lines, produkt).map(|i| &self.lines[i].item)
    }

    pub fn get_mut(&mut self, produkt: &str) -> Option<&mut BasketItem> {
        index_of(&self.lines, produkt).map(move |i| &mut self.lines[i].item)
    }

    /// Insert or overwrite. An existing product keeps its position.
    pub fn upsert(&mut self, produkt: &str, item: BasketItem) {
        match index_of(&self.lines, produkt) {
            Some(i) => self.lines[i].item = item,
            None => self.lines.push(ProductLine::new(produkt, item)),
        }
    }

    pub fn remove(&mut self, produkt: &str) -> Option<BasketItem> {
        index_of(&self.lines, produkt).map(|i| self.lines.remove(i).item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BasketItem)> {
        self.lines.iter().map(|l| (l.produkt.as_str(), &l.item))
    }
}

impl Entity for Section {
    type Key = String;

    fn key(&self) -> Self::Key {
        self.name.clone()
    }
}

impl NamedEntity for Section {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Position of the entity with the given key in an ordered list
pub fn index_of<T: NamedEntity>(list: &[T], key: &str) -> Option<usize> {
    list.iter().position(|e| e.name() == key)
}
