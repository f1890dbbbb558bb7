//! Commands for Basket Lines
//!
//! Turn raw UI strings into typed ledger calls.

use serde::Deserialize;

use crate::basket::{BasketStore, CoefficientOverrideOperations};
use crate::domain::{parse_amount, parse_quantity, CatalogRow, DomainError, DomainResult, ItemEdit};

/// Add a product picked from the catalog grid.
///
/// Accepted layouts (8, 9 or 11 cells):
/// `produkt, jednotky, dodavatel, odkaz, koef_mat, nakup_mat, cena_prace,
/// koef_prace, [section], [pocet_mat, pocet_prace]`.
/// Returns `false` when the product is already in the section.
pub fn add_catalog_row(store: &mut BasketStore, fields: &[String], section: Option<&str>) -> Result<bool, String> {
    let row = parse_catalog_row(fields).map_err(|e| e.to_string())?;
    Ok(store.add_item(row, section))
}

fn parse_catalog_row(fields: &[String]) -> DomainResult<CatalogRow> {
    if !matches!(fields.len(), 8 | 9 | 11) {
        return Err(DomainError::InvalidInput(format!(
            "catalog row needs 8, 9 or 11 cells, got {}",
            fields.len()
        )));
    }

    let mut row = CatalogRow {
        produkt: fields[0].trim().to_string(),
        jednotky: fields[1].trim().to_string(),
        dodavatel: fields[2].trim().to_string(),
        odkaz: fields[3].trim().to_string(),
        koeficient_material: parse_amount("koeficient_material", &fields[4])?,
        nakup_materialu: parse_amount("nakup_materialu", &fields[5])?,
        cena_prace: parse_amount("cena_prace", &fields[6])?,
        koeficient_prace: parse_amount("koeficient_prace", &fields[7])?,
        ..Default::default()
    };

    if let Some(section) = fields.get(8).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        row.section = Some(section.to_string());
    }
    if fields.len() == 11 {
        row.pocet_materialu = Some(parse_quantity("pocet_materialu", &fields[9])?);
        row.pocet_prace = Some(parse_quantity("pocet_prace", &fields[10])?);
    }
    Ok(row)
}

/// Values typed into the custom item dialog
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomItemForm {
    pub produkt: String,
    pub jednotky: String,
    pub dodavatel: String,
    pub odkaz: String,
    pub koeficient_material: String,
    pub nakup_materialu: String,
    pub cena_prace: String,
    pub koeficient_prace: String,
    pub pocet_materialu: String,
    pub pocet_prace: String,
}

impl CustomItemForm {
    fn to_row(&self) -> DomainResult<CatalogRow> {
        Ok(CatalogRow {
            produkt: self.produkt.trim().to_string(),
            jednotky: self.jednotky.trim().to_string(),
            dodavatel: self.dodavatel.trim().to_string(),
            odkaz: self.odkaz.trim().to_string(),
            koeficient_material: amount_or("koeficient_material", &self.koeficient_material, 1.0)?,
            nakup_materialu: amount_or("nakup_materialu", &self.nakup_materialu, 0.0)?,
            cena_prace: amount_or("cena_prace", &self.cena_prace, 0.0)?,
            koeficient_prace: amount_or("koeficient_prace", &self.koeficient_prace, 1.0)?,
            pocet_materialu: quantity_opt("pocet_materialu", &self.pocet_materialu)?,
            pocet_prace: quantity_opt("pocet_prace", &self.pocet_prace)?,
            section: None,
        })
    }
}

// Blank dialog fields take the default
fn amount_or(field: &str, raw: &str, default: f64) -> DomainResult<f64> {
    if raw.trim().is_empty() {
        Ok(default)
    } else {
        parse_amount(field, raw)
    }
}

fn quantity_opt(field: &str, raw: &str) -> DomainResult<Option<u32>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_quantity(field, raw).map(Some)
    }
}

/// Add a manually entered line; returns the name it was stored under
pub fn add_custom_item(store: &mut BasketStore, form: &CustomItemForm, section: Option<&str>) -> Result<String, String> {
    let row = form.to_row().map_err(|e| e.to_string())?;
    store.add_custom_item(row, section).map_err(|e| e.to_string())
}

/// Edit one cell of a line
pub fn edit_item_field(
    store: &mut BasketStore,
    section: &str,
    produkt: &str,
    field: &str,
    raw: &str,
) -> Result<(), String> {
    let edit = ItemEdit::parse(field, raw).map_err(|e| e.to_string())?;
    store.update_item(section, produkt, edit).map_err(|e| e.to_string())
}

/// Put a line back to its add-time values
pub fn reset_item(store: &mut BasketStore, section: &str, produkt: &str) -> bool {
    store.reset_item(section, produkt)
}

fn unknown_axis(axis: &str) -> String {
    format!("unknown coefficient axis '{}' (expected global, material or work)", axis)
}

/// Bulk-set a coefficient; `axis` is `global`, `material` or `work`
pub fn apply_coefficient(store: &mut BasketStore, axis: &str, raw: &str) -> Result<(), String> {
    let factor = parse_amount("coefficient", raw).map_err(|e| e.to_string())?;
    let result = match axis {
        "global" => store.apply_global_coefficient(factor),
        "material" => store.apply_material_coefficient(factor),
        "work" => store.apply_work_coefficient(factor),
        other => return Err(unknown_axis(other)),
    };
    result.map_err(|e| e.to_string())
}

/// Undo bulk coefficient changes on `axis`; `false` when there were none
pub fn revert_coefficient(store: &mut BasketStore, axis: &str) -> Result<bool, String> {
    match axis {
        "global" => Ok(store.revert_coefficient()),
        "material" => Ok(store.revert_material_coefficient()),
        "work" => Ok(store.revert_work_coefficient()),
        other => Err(unknown_axis(other)),
    }
}
