//! Basket Views
//!
//! Read-only projections of the committed ledger:
//! - [`SectionView`]/[`ItemView`] for the grid renderer
//! - [`ViewSection`]/[`ViewRow`], the grid structure handed back to `reorder`
//! - [`ExportRow`], the flat rows of the spreadsheet export

use serde::Serialize;

use crate::domain::{
    format_amount, parse_amount, parse_quantity, price_item, BasketItem, DomainError, DomainResult, ItemPricing,
};

use super::store::BasketStore;

/// Number of cells in a rendered grid row
pub const DISPLAY_COLUMNS: usize = 20;

const SYNC_MARK: &str = "\u{2713}";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub produkt: String,
    pub item: BasketItem,
    pub pricing: ItemPricing,
}

impl ItemView {
    /// Grid cells, money and coefficients rendered with two decimals:
    ///
    /// ```text
    ///  0 produkt          5 unit_sell_m    10 pocet_prace   15 total_sell_l
    ///  1 jednotky         6 total_cost_m   11 koef_prace    16 profit_l
    ///  2 pocet_materialu  7 total_sell_m   12 cena_prace    17 margin_l
    ///  3 koef_mat         8 profit_m       13 total_cost_l  18 line_total
    ///  4 nakup_mat        9 margin_m       14 unit_sell_l   19 sync
    /// ```
    pub fn display_columns(&self) -> [String; DISPLAY_COLUMNS] {
        let item = &self.item;
        let m = &self.pricing.material;
        let l = &self.pricing.labor;
        [
            self.produkt.clone(),
            item.jednotky.clone(),
            item.pocet_materialu.to_string(),
            format_amount(item.koeficient_material),
            format_amount(item.nakup_materialu),
            format_amount(m.unit_sell),
            format_amount(m.total_cost),
            format_amount(m.total_sell),
            format_amount(m.profit),
            format_amount(m.margin_pct),
            item.pocet_prace.to_string(),
            format_amount(item.koeficient_prace),
            format_amount(item.cena_prace),
            format_amount(l.total_cost),
            format_amount(l.unit_sell),
            format_amount(l.total_sell),
            format_amount(l.profit),
            format_amount(l.margin_pct),
            format_amount(self.pricing.line_total),
            if item.sync { SYNC_MARK.to_string() } else { String::new() },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub name: String,
    pub items: Vec<ItemView>,
}

/// One row of the rendered grid, as read back for a reorder.
///
/// The grid shows no supplier or link, so a row carries neither.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub produkt: String,
    pub jednotky: String,
    pub pocet_materialu: u32,
    pub koeficient_material: f64,
    pub nakup_materialu: f64,
    pub pocet_prace: u32,
    pub koeficient_prace: f64,
    pub cena_prace: f64,
    pub sync: bool,
}

impl ViewRow {
    pub fn from_line(produkt: &str, item: &BasketItem) -> Self {
        Self {
            produkt: produkt.to_string(),
            jednotky: item.jednotky.clone(),
            pocet_materialu: item.pocet_materialu,
            koeficient_material: item.koeficient_material,
            nakup_materialu: item.nakup_materialu,
            pocet_prace: item.pocet_prace,
            koeficient_prace: item.koeficient_prace,
            cena_prace: item.cena_prace,
            sync: item.sync,
        }
    }

    /// Parse a row laid out as [`ItemView::display_columns`]; derived cells are ignored
    pub fn from_columns(cells: &[String]) -> DomainResult<Self> {
        if cells.len() < DISPLAY_COLUMNS {
            return Err(DomainError::InvalidInput(format!(
                "grid row needs {} cells, got {}",
                DISPLAY_COLUMNS,
                cells.len()
            )));
        }

        Ok(Self {
            produkt: cells[0].trim().to_string(),
            jednotky: cells[1].trim().to_string(),
            pocet_materialu: parse_quantity("pocet_materialu", &cells[2])?,
            koeficient_material: parse_amount("koeficient_material", &cells[3])?,
            nakup_materialu: parse_amount("nakup_materialu", &cells[4])?,
            pocet_prace: parse_quantity("pocet_prace", &cells[10])?,
            koeficient_prace: parse_amount("koeficient_prace", &cells[11])?,
            cena_prace: parse_amount("cena_prace", &cells[12])?,
            sync: cells[19].trim() == SYNC_MARK,
        })
    }

    /// Ledger line for this row; `dodavatel` and `odkaz` come back empty
    pub fn to_item(&self) -> BasketItem {
        BasketItem {
            jednotky: self.jednotky.clone(),
            dodavatel: String::new(),
            odkaz: String::new(),
            koeficient_material: self.koeficient_material,
            koeficient_prace: self.koeficient_prace,
            nakup_materialu: self.nakup_materialu,
            cena_prace: self.cena_prace,
            pocet_materialu: self.pocet_materialu,
            pocet_prace: self.pocet_prace,
            sync: self.sync,
        }
    }
}

/// A section of the rendered grid
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSection {
    pub name: String,
    pub rows: Vec<ViewRow>,
}

impl ViewSection {
    pub fn new(name: impl Into<String>, rows: Vec<ViewRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Flattened line for the spreadsheet export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    /// 1-based running number over the whole basket
    pub counter: usize,
    pub section: String,
    pub produkt: String,
    pub jednotky: String,
    pub dodavatel: String,
    pub odkaz: String,
    pub koeficient_material: f64,
    pub koeficient_prace: f64,
    pub nakup_materialu: f64,
    pub cena_prace: f64,
    pub pocet_materialu: u32,
    pub pocet_prace: u32,
    pub unit_sell_material: f64,
    pub total_sell_material: f64,
    pub total_sell_work: f64,
    pub line_total: f64,
}

impl BasketStore {
    /// Committed ledger in display order, with derived pricing
    pub fn view(&self) -> Vec<SectionView> {
        self.sections()
            .iter()
            .map(|section| SectionView {
                name: section.name.clone(),
                items: section
                    .iter()
                    .map(|(produkt, item)| ItemView {
                        produkt: produkt.to_string(),
                        item: item.clone(),
                        pricing: price_item(item),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Grid structure of the committed ledger, the shape `reorder` expects back
    pub fn view_sections(&self) -> Vec<ViewSection> {
        self.sections()
            .iter()
            .map(|section| {
                ViewSection::new(
                    section.name.as_str(),
                    section
                        .iter()
                        .map(|(produkt, item)| ViewRow::from_line(produkt, item))
                        .collect(),
                )
            })
            .collect()
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.sections()
            .iter()
            .flat_map(|section| section.iter().map(move |(produkt, item)| (section.name.as_str(), produkt, item)))
            .enumerate()
            .map(|(i, (section, produkt, item))| {
                let pricing = price_item(item);
                ExportRow {
                    counter: i + 1,
                    section: section.to_string(),
                    produkt: produkt.to_string(),
                    jednotky: item.jednotky.clone(),
                    dodavatel: item.dodavatel.clone(),
                    odkaz: item.odkaz.clone(),
                    koeficient_material: item.koeficient_material,
                    koeficient_prace: item.koeficient_prace,
                    nakup_materialu: item.nakup_materialu,
                    cena_prace: item.cena_prace,
                    pocet_materialu: item.pocet_materialu,
                    pocet_prace: item.pocet_prace,
                    unit_sell_material: pricing.material.unit_sell,
                    total_sell_material: pricing.material.total_sell,
                    total_sell_work: pricing.labor.total_sell,
                    line_total: pricing.line_total,
                }
            })
            .collect()
    }
}
