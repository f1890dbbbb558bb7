//! Pricing Calculator
//!
//! Pure functions deriving sell prices, cost, profit and margin from the raw
//! fields of a line. Material and labor are priced independently:
//!
//! ```text
//! unit_sell   = unit cost * coefficient
//! total_sell  = unit_sell * quantity
//! total_cost  = unit cost * quantity
//! profit      = total_sell - total_cost
//! margin %    = profit / total_sell * 100   (0 when total_sell is 0)
//! line_total  = material total_sell + labor total_sell
//! ```

use serde::Serialize;

use super::item::BasketItem;
use super::section::Section;

/// Derived figures for one pricing axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisPricing {
    pub unit_sell: f64,
    pub total_sell: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub margin_pct: f64,
}

impl AxisPricing {
    pub fn compute(unit_cost: f64, coefficient: f64, quantity: u32) -> Self {
        let quantity = f64::from(quantity);
        let unit_sell = unit_cost * coefficient;
        let total_sell = unit_sell * quantity;
        let total_cost = unit_cost * quantity;
        let profit = total_sell - total_cost;
        let margin_pct = if total_sell == 0.0 {
            0.0
        } else {
            profit / total_sell * 100.0
        };

        Self {
            unit_sell,
            total_sell,
            total_cost,
            profit,
            margin_pct,
        }
    }
}

/// Derived figures for one line
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ItemPricing {
    pub material: AxisPricing,
    pub labor: AxisPricing,
    pub line_total: f64,
}

pub fn price_item(item: &BasketItem) -> ItemPricing {
    let material = AxisPricing::compute(item.nakup_materialu, item.koeficient_material, item.pocet_materialu);
    let labor = AxisPricing::compute(item.cena_prace, item.koeficient_prace, item.pocet_prace);

    ItemPricing {
        material,
        labor,
        line_total: material.total_sell + labor.total_sell,
    }
}

/// Basket aggregates.
///
/// `material` and `work` are sums of the *sell* totals per axis, not of the
/// purchase cost.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub material: f64,
    pub work: f64,
    pub grand: f64,
}

impl Totals {
    /// Footer text shown under the basket
    pub fn label(&self) -> String {
        format!("Spolu: {}", format_amount(self.grand))
    }
}

pub fn recompute_totals(sections: &[Section]) -> Totals {
    let (material, work) = sections
        .iter()
        .flat_map(|s| s.iter())
        .map(|(_, item)| price_item(item))
        .fold((0.0, 0.0), |(m, w), p| (m + p.material.total_sell, w + p.labor.total_sell));

    Totals {
        material,
        work,
        grand: material + work,
    }
}

/// Two-decimal rendering used by the basket grid
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}
