//! Basket Item Entity
//!
//! One priced product line. The item does not carry its own name: the
//! product name is the key inside its section (see [`ProductLine`]).

use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity, NamedEntity};

/// Key of an item in the ledger: `(section, produkt)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub section: String,
    pub produkt: String,
}

impl ItemKey {
    pub fn new(section: impl Into<String>, produkt: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            produkt: produkt.into(),
        }
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.section, self.produkt)
    }
}

/// Raw fields of a priced line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    /// Unit label (ks, m, bal, ...)
    pub jednotky: String,
    /// Supplier
    pub dodavatel: String,
    /// Reference link
    pub odkaz: String,
    /// Material sell coefficient
    pub koeficient_material: f64,
    /// Labor sell coefficient
    pub koeficient_prace: f64,
    /// Material unit purchase cost
    pub nakup_materialu: f64,
    /// Labor unit rate
    pub cena_prace: f64,
    /// Material quantity (>= 1)
    pub pocet_materialu: u32,
    /// Labor quantity (>= 1)
    pub pocet_prace: u32,
    /// UI hint: both quantities move together
    pub sync: bool,
}

impl Default for BasketItem {
    fn default() -> Self {
        Self {
            jednotky: String::new(),
            dodavatel: String::new(),
            odkaz: String::new(),
            koeficient_material: 1.0,
            koeficient_prace: 1.0,
            nakup_materialu: 0.0,
            cena_prace: 0.0,
            pocet_materialu: 1,
            pocet_prace: 1,
            sync: true,
        }
    }
}

impl BasketItem {
    /// Check the numeric invariants of a line
    pub fn validate(&self) -> DomainResult<()> {
        check_amount("koeficient_material", self.koeficient_material)?;
        check_amount("koeficient_prace", self.koeficient_prace)?;
        check_amount("nakup_materialu", self.nakup_materialu)?;
        check_amount("cena_prace", self.cena_prace)?;
        check_quantity("pocet_materialu", self.pocet_materialu)?;
        check_quantity("pocet_prace", self.pocet_prace)?;
        Ok(())
    }
}

/// A product name paired with its line, as stored inside a section
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLine {
    pub produkt: String,
    pub item: BasketItem,
}

impl ProductLine {
    pub fn new(produkt: impl Into<String>, item: BasketItem) -> Self {
        Self {
            produkt: produkt.into(),
            item,
        }
    }
}

impl Entity for ProductLine {
    type Key = String;

    fn key(&self) -> Self::Key {
        self.produkt.clone()
    }
}

impl NamedEntity for ProductLine {
    fn name(&self) -> &str {
        &self.produkt
    }
}

/// A row picked from the product catalog.
///
/// Quantities are optional and default to 1; `section` is the optional
/// trailing field used when the caller does not name a section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogRow {
    pub produkt: String,
    pub jednotky: String,
    pub dodavatel: String,
    pub odkaz: String,
    pub koeficient_material: f64,
    pub nakup_materialu: f64,
    pub cena_prace: f64,
    pub koeficient_prace: f64,
    pub pocet_materialu: Option<u32>,
    pub pocet_prace: Option<u32>,
    pub section: Option<String>,
}

impl CatalogRow {
    /// Build the ledger line for this row. New lines start with `sync` on.
    pub fn to_item(&self) -> BasketItem {
        BasketItem {
            jednotky: self.jednotky.clone(),
            dodavatel: self.dodavatel.clone(),
            odkaz: self.odkaz.clone(),
            koeficient_material: self.koeficient_material,
            koeficient_prace: self.koeficient_prace,
            nakup_materialu: self.nakup_materialu,
            cena_prace: self.cena_prace,
            pocet_materialu: self.pocet_materialu.unwrap_or(1),
            pocet_prace: self.pocet_prace.unwrap_or(1),
            sync: true,
        }
    }
}

/// Single-field edit on an existing line
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEdit {
    Jednotky(String),
    Dodavatel(String),
    Odkaz(String),
    KoeficientMaterial(f64),
    KoeficientPrace(f64),
    NakupMaterialu(f64),
    CenaPrace(f64),
    PocetMaterialu(u32),
    PocetPrace(u32),
    Sync(bool),
}

impl ItemEdit {
    /// Parse raw input for the named field.
    ///
    /// Numbers use a dot or a comma as decimal separator; quantities accept
    /// whole-valued decimals such as `"20.0"`.
    pub fn parse(field: &str, raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        let edit = match field {
            "jednotky" => ItemEdit::Jednotky(raw.to_string()),
            "dodavatel" => ItemEdit::Dodavatel(raw.to_string()),
            "odkaz" => ItemEdit::Odkaz(raw.to_string()),
            "koeficient_material" => ItemEdit::KoeficientMaterial(parse_amount(field, raw)?),
            "koeficient_prace" => ItemEdit::KoeficientPrace(parse_amount(field, raw)?),
            "nakup_materialu" => ItemEdit::NakupMaterialu(parse_amount(field, raw)?),
            "cena_prace" => ItemEdit::CenaPrace(parse_amount(field, raw)?),
            "pocet_materialu" => ItemEdit::PocetMaterialu(parse_quantity(field, raw)?),
            "pocet_prace" => ItemEdit::PocetPrace(parse_quantity(field, raw)?),
            "sync" => ItemEdit::Sync(parse_flag(raw)),
            other => return Err(DomainError::InvalidInput(format!("unknown field '{}'", other))),
        };
        edit.validate()?;
        Ok(edit)
    }

    /// Range checks for the value carried by the edit
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            ItemEdit::KoeficientMaterial(v) => check_amount("koeficient_material", *v),
            ItemEdit::KoeficientPrace(v) => check_amount("koeficient_prace", *v),
            ItemEdit::NakupMaterialu(v) => check_amount("nakup_materialu", *v),
            ItemEdit::CenaPrace(v) => check_amount("cena_prace", *v),
            ItemEdit::PocetMaterialu(q) => check_quantity("pocet_materialu", *q),
            ItemEdit::PocetPrace(q) => check_quantity("pocet_prace", *q),
            ItemEdit::Jednotky(_) | ItemEdit::Dodavatel(_) | ItemEdit::Odkaz(_) | ItemEdit::Sync(_) => Ok(()),
        }
    }

    /// Write the value into `item`
    pub fn apply_to(self, item: &mut BasketItem) {
        match self {
            ItemEdit::Jednotky(v) => item.jednotky = v,
            ItemEdit::Dodavatel(v) => item.dodavatel = v,
            ItemEdit::Odkaz(v) => item.odkaz = v,
            ItemEdit::KoeficientMaterial(v) => item.koeficient_material = v,
            ItemEdit::KoeficientPrace(v) => item.koeficient_prace = v,
            ItemEdit::NakupMaterialu(v) => item.nakup_materialu = v,
            ItemEdit::CenaPrace(v) => item.cena_prace = v,
            ItemEdit::PocetMaterialu(q) => item.pocet_materialu = q,
            ItemEdit::PocetPrace(q) => item.pocet_prace = q,
            ItemEdit::Sync(v) => item.sync = v,
        }
    }
}

/// Coefficients, costs and rates must be finite. Negative values are
/// allowed so a line can carry a discount.
pub fn check_amount(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() {
        return Err(DomainError::InvalidInput(format!(
            "{} must be a finite number, got {}",
            field, value
        )));
    }
    Ok(())
}

fn check_quantity(field: &str, value: u32) -> DomainResult<()> {
    if value < 1 {
        return Err(DomainError::InvalidInput(format!("{} must be at least 1", field)));
    }
    Ok(())
}

/// Parse a decimal number typed by the user
pub fn parse_amount(field: &str, raw: &str) -> DomainResult<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| DomainError::InvalidInput(format!("{}: '{}' is not a number", field, raw)))
}

/// Parse a quantity; `"3"` and `"3.0"` are both accepted, `"2.5"` is not
pub fn parse_quantity(field: &str, raw: &str) -> DomainResult<u32> {
    let trimmed = raw.trim();
    if let Ok(q) = trimmed.parse::<u32>() {
        return Ok(q);
    }
    let value = parse_amount(field, trimmed)?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(DomainError::InvalidInput(format!(
            "{}: '{}' is not a whole quantity",
            field, raw
        )));
    }
    Ok(value as u32)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "ano" | "\u{2713}"
    )
}
