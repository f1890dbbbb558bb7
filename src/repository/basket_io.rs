//! Basket File Codec
//!
//! JSON document layout:
//!
//! ```text
//! {
//!   "user_name": "...",
//!   "items": [ { "section": "...", "products": [ { "produkt": "...", ... } ] } ],
//!   "notes": [ { "state": 1, "text": "..." } ]
//! }
//! ```
//!
//! Writing is strict and atomic. Reading is tolerant: missing or malformed
//! fields take defaults, and a file that cannot be read at all loads as an
//! empty basket.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::basket::BasketStore;
use crate::config::LedgerConfig;
use crate::domain::{parse_amount, BasketItem, DomainError, DomainResult, Note, Section};

use super::traits::BasketRepository;

#[derive(Serialize)]
struct DocumentOut<'a> {
    user_name: &'a str,
    items: Vec<SectionOut<'a>>,
    notes: &'a [Note],
}

#[derive(Serialize)]
struct SectionOut<'a> {
    section: &'a str,
    products: Vec<ProductOut<'a>>,
}

#[derive(Serialize)]
struct ProductOut<'a> {
    produkt: &'a str,
    jednotky: &'a str,
    dodavatel: &'a str,
    odkaz: &'a str,
    koeficient_material: f64,
    koeficient_prace: f64,
    nakup_materialu: f64,
    cena_prace: f64,
    pocet_prace: u32,
    pocet_materialu: u32,
    sync: bool,
}

impl<'a> ProductOut<'a> {
    fn new(produkt: &'a str, item: &'a BasketItem) -> Self {
        Self {
            produkt,
            jednotky: &item.jednotky,
            dodavatel: &item.dodavatel,
            odkaz: &item.odkaz,
            koeficient_material: item.koeficient_material,
            koeficient_prace: item.koeficient_prace,
            nakup_materialu: item.nakup_materialu,
            cena_prace: item.cena_prace,
            pocet_prace: item.pocet_prace,
            pocet_materialu: item.pocet_materialu,
            sync: item.sync,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DocumentIn {
    #[serde(deserialize_with = "lenient_string")]
    user_name: String,
    #[serde(deserialize_with = "lenient_list")]
    items: Vec<SectionIn>,
    #[serde(deserialize_with = "lenient_list")]
    notes: Vec<Note>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SectionIn {
    #[serde(deserialize_with = "lenient_string")]
    section: String,
    #[serde(deserialize_with = "lenient_list")]
    products: Vec<ProductIn>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ProductIn {
    #[serde(deserialize_with = "lenient_string")]
    produkt: String,
    #[serde(deserialize_with = "lenient_string")]
    jednotky: String,
    #[serde(deserialize_with = "lenient_string")]
    dodavatel: String,
    #[serde(deserialize_with = "lenient_string")]
    odkaz: String,
    #[serde(deserialize_with = "lenient_number")]
    koeficient_material: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    koeficient_prace: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    nakup_materialu: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    cena_prace: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pocet_materialu: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pocet_prace: Option<f64>,
    #[serde(deserialize_with = "lenient_flag")]
    sync: Option<bool>,
    // Older files name the flag `sync_qty`
    #[serde(deserialize_with = "lenient_flag")]
    sync_qty: Option<bool>,
}

impl ProductIn {
    fn into_item(self) -> BasketItem {
        BasketItem {
            jednotky: self.jednotky,
            dodavatel: self.dodavatel,
            odkaz: self.odkaz,
            koeficient_material: amount_or(self.koeficient_material, 0.0),
            koeficient_prace: amount_or(self.koeficient_prace, 1.0),
            nakup_materialu: amount_or(self.nakup_materialu, 0.0),
            cena_prace: amount_or(self.cena_prace, 0.0),
            pocet_materialu: quantity_or_one(self.pocet_materialu),
            pocet_prace: quantity_or_one(self.pocet_prace),
            sync: self.sync.or(self.sync_qty).unwrap_or(false),
        }
    }
}

fn amount_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

fn quantity_or_one(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v >= 1.0 => v.min(u32::MAX as f64) as u32,
        _ => 1,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount("number", &s).ok(),
        _ => None,
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|v| v != 0.0)),
        Value::String(s) => Some(matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true")),
        _ => None,
    })
}

/// A list whose malformed entries are dropped instead of failing the document
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// What a basket file holds besides the ledger itself
#[derive(Debug)]
pub struct LoadedBasket {
    pub basket: BasketStore,
    pub user_name: String,
    pub notes: Vec<Note>,
}

impl LoadedBasket {
    fn empty(config: LedgerConfig) -> Self {
        Self {
            basket: BasketStore::with_config(config),
            user_name: String::new(),
            notes: Vec::new(),
        }
    }
}

/// Encode the ledger as pretty JSON
pub fn to_json(basket: &BasketStore, user_name: &str, notes: &[Note]) -> DomainResult<String> {
    let document = DocumentOut {
        user_name,
        items: basket
            .sections()
            .iter()
            .map(|section| SectionOut {
                section: &section.name,
                products: section
                    .lines
                    .iter()
                    .map(|line| ProductOut::new(&line.produkt, &line.item))
                    .collect(),
            })
            .collect(),
        notes,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Decode a basket document. Fails only when the text is not a JSON object.
pub fn from_json(json: &str, config: LedgerConfig) -> DomainResult<LoadedBasket> {
    let document: DocumentIn = serde_json::from_str(json)?;

    let mut sections: Vec<Section> = Vec::new();
    for raw in document.items {
        let mut section = Section::new(raw.section.as_str());
        for product in raw.products {
            if product.produkt.is_empty() {
                continue;
            }
            let produkt = product.produkt.clone();
            section.upsert(&produkt, product.into_item());
        }
        match sections.iter().position(|s| s.name == section.name) {
            Some(idx) => sections[idx] = section,
            None => sections.push(section),
        }
    }

    Ok(LoadedBasket {
        basket: BasketStore::from_sections(sections, config),
        user_name: document.user_name,
        notes: document.notes,
    })
}

/// Write the basket to `path`.
///
/// The document is written to a temporary file next to `path` and renamed
/// over it, so an existing file is never left half written.
pub fn save(path: impl AsRef<Path>, basket: &mut BasketStore, user_name: &str, notes: &[Note]) -> DomainResult<()> {
    let path = path.as_ref();
    let json = to_json(basket, user_name, notes)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| DomainError::Persistence(format!("{}: {}", path.display(), e.error)))?;

    basket.mark_saved();
    info!("saved basket to {} ({} items)", path.display(), basket.item_count());
    Ok(())
}

/// Read a basket file with the default ledger configuration
pub fn load(path: impl AsRef<Path>) -> LoadedBasket {
    load_with_config(path, LedgerConfig::default())
}

/// Read a basket file. Anything unreadable yields an empty basket.
pub fn load_with_config(path: impl AsRef<Path>, config: LedgerConfig) -> LoadedBasket {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("cannot read basket {}: {}", path.display(), e);
            return LoadedBasket::empty(config);
        }
    };

    match from_json(&content, config.clone()) {
        Ok(loaded) => {
            info!("loaded basket from {} ({} items)", path.display(), loaded.basket.item_count());
            loaded
        }
        Err(e) => {
            warn!("cannot parse basket {}: {}", path.display(), e);
            LoadedBasket::empty(config)
        }
    }
}

/// Suggested file name for a save made at `now`
pub fn default_file_name(now: NaiveDateTime) -> String {
    format!("basket_{}.json", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// A basket document at a fixed path
#[derive(Debug, Clone)]
pub struct JsonBasketFile {
    path: PathBuf,
    config: LedgerConfig,
}

impl JsonBasketFile {
    pub fn new(path: impl Into<PathBuf>, config: LedgerConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BasketRepository for JsonBasketFile {
    fn save(&self, basket: &mut BasketStore, user_name: &str, notes: &[Note]) -> DomainResult<()> {
        save(&self.path, basket, user_name, notes)
    }

    fn load(&self) -> LoadedBasket {
        load_with_config(&self.path, self.config.clone())
    }
}
