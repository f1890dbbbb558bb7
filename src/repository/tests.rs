//! Repository Integration Tests
//!
//! Basket files on a temporary directory.

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::basket::{BasketStore, HistoryOperations};
    use crate::config::LedgerConfig;
    use crate::domain::{CatalogRow, ItemEdit, Note};
    use crate::repository::{
        default_file_name, from_json, load, save, to_json, BasketRepository, JsonBasketFile,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn sample_store() -> BasketStore {
        let mut store = BasketStore::new();
        store.add_item(
            CatalogRow {
                produkt: "Kamera IP 4MP".to_string(),
                jednotky: "ks".to_string(),
                dodavatel: "Dahua".to_string(),
                odkaz: "https://example.com/kamera".to_string(),
                koeficient_material: 1.35,
                koeficient_prace: 1.1,
                nakup_materialu: 89.9,
                cena_prace: 25.0,
                pocet_materialu: Some(4),
                pocet_prace: Some(4),
                section: None,
            },
            Some("Kamerový systém"),
        );
        store.add_item(
            CatalogRow {
                produkt: "Kábel UTP".to_string(),
                jednotky: "m".to_string(),
                koeficient_material: 1.0 / 3.0,
                koeficient_prace: 2.0,
                nakup_materialu: 0.45,
                cena_prace: 0.7,
                pocet_materialu: Some(120),
                pocet_prace: Some(120),
                ..Default::default()
            },
            Some("Kabeláž"),
        );
        store
            .update_item("Kabeláž", "Kábel UTP", ItemEdit::Sync(false))
            .unwrap();
        store
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basket.json");
        let mut store = sample_store();
        let notes = vec![Note::new("Cena bez DPH"), Note::unchecked("interné")];

        save(&path, &mut store, "Ján Novák", &notes).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.user_name, "Ján Novák");
        assert_eq!(loaded.notes, notes);

        let expected: Vec<_> = store.sections().iter().map(|s| s.name.clone()).collect();
        let actual: Vec<_> = loaded.basket.sections().iter().map(|s| s.name.clone()).collect();
        assert_eq!(actual, expected);

        for section in store.sections() {
            for (produkt, item) in section.iter() {
                let other = loaded.basket.get(&section.name, produkt).unwrap();
                assert_eq!(other.jednotky, item.jednotky);
                assert_eq!(other.dodavatel, item.dodavatel);
                assert_eq!(other.odkaz, item.odkaz);
                assert!(close(other.koeficient_material, item.koeficient_material));
                assert!(close(other.koeficient_prace, item.koeficient_prace));
                assert!(close(other.nakup_materialu, item.nakup_materialu));
                assert!(close(other.cena_prace, item.cena_prace));
                assert_eq!(other.pocet_materialu, item.pocet_materialu);
                assert_eq!(other.pocet_prace, item.pocet_prace);
                assert_eq!(other.sync, item.sync);
            }
        }
    }

    #[test]
    fn test_save_clears_modified_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = sample_store();
        assert!(store.is_modified());

        save(dir.path().join("a.json"), &mut store, "", &[]).unwrap();
        assert!(!store.is_modified());
        assert!(store.can_undo());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_keeps_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projekt").join("2024").join("basket.json");
        let mut store = sample_store();

        save(&path, &mut store, "Ľubo", &[]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"Kabeláž\""));
        assert!(text.contains("\"user_name\": \"Ľubo\""));
        assert!(text.contains("\n  \"items\""));
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let mut store = sample_store();
        let result = save(blocker.join("basket.json"), &mut store, "", &[]);
        assert!(result.is_err());
        assert!(store.is_modified());
    }

    #[test]
    fn test_load_missing_or_corrupt_file_gives_empty_basket() {
        let dir = tempfile::tempdir().unwrap();

        let missing = load(dir.path().join("none.json"));
        assert!(missing.basket.is_empty());
        assert_eq!(missing.user_name, "");
        assert!(missing.notes.is_empty());

        let corrupt = dir.path().join("corrupt.json");
        fs::write(&corrupt, "{\"items\": [").unwrap();
        let loaded = load(&corrupt);
        assert!(loaded.basket.is_empty());
        assert_eq!(loaded.user_name, "");
    }

    #[test]
    fn test_partial_products_take_defaults() {
        let json = r#"{
            "items": [
                { "section": "S", "products": [
                    { "produkt": "Bare" },
                    { "produkt": "Strings", "nakup_materialu": "12,5", "pocet_prace": "3",
                      "koeficient_prace": "abc", "sync_qty": true },
                    { "produkt": "Zero", "pocet_materialu": 0, "pocet_prace": 2.7 },
                    { "produkt": "" },
                    { "jednotky": "ks" },
                    42
                ] }
            ]
        }"#;
        let loaded = from_json(json, LedgerConfig::default()).unwrap();
        let store = &loaded.basket;
        assert_eq!(store.item_count(), 3);
        assert_eq!(loaded.user_name, "");

        let bare = store.get("S", "Bare").unwrap();
        assert_eq!(bare.koeficient_material, 0.0);
        assert_eq!(bare.koeficient_prace, 1.0);
        assert_eq!(bare.nakup_materialu, 0.0);
        assert_eq!(bare.pocet_materialu, 1);
        assert_eq!(bare.pocet_prace, 1);
        assert!(!bare.sync);
        assert_eq!(bare.jednotky, "");

        let strings = store.get("S", "Strings").unwrap();
        assert_eq!(strings.nakup_materialu, 12.5);
        assert_eq!(strings.pocet_prace, 3);
        assert_eq!(strings.koeficient_prace, 1.0);
        assert!(strings.sync);

        let zero = store.get("S", "Zero").unwrap();
        assert_eq!(zero.pocet_materialu, 1);
        assert_eq!(zero.pocet_prace, 2);
    }

    #[test]
    fn test_negative_amounts_survive_load() {
        let json = r#"{
            "items": [
                { "section": "Zľavy", "products": [
                    { "produkt": "Zlava", "nakup_materialu": -50.0, "cena_prace": -10.0 },
                    { "produkt": "Text", "nakup_materialu": "-12,5", "koeficient_prace": "NaN" }
                ] }
            ]
        }"#;
        let loaded = from_json(json, LedgerConfig::default()).unwrap();

        let zlava = loaded.basket.get("Zľavy", "Zlava").unwrap();
        assert_eq!(zlava.nakup_materialu, -50.0);
        assert_eq!(zlava.cena_prace, -10.0);

        let text = loaded.basket.get("Zľavy", "Text").unwrap();
        assert_eq!(text.nakup_materialu, -12.5);
        assert_eq!(text.koeficient_prace, 1.0);
    }

    #[test]
    fn test_sync_and_legacy_sync_qty_together() {
        let json = r#"{
            "items": [
                { "section": "S", "products": [
                    { "produkt": "A", "sync": true, "sync_qty": true },
                    { "produkt": "B", "sync": false, "sync_qty": true },
                    { "produkt": "C", "sync_qty": 1 },
                    { "produkt": "D", "sync": null, "sync_qty": "true" }
                ] }
            ]
        }"#;
        let loaded = from_json(json, LedgerConfig::default()).unwrap();
        let store = &loaded.basket;
        assert_eq!(store.item_count(), 4);
        assert!(store.get("S", "A").unwrap().sync);
        assert!(!store.get("S", "B").unwrap().sync);
        assert!(store.get("S", "C").unwrap().sync);
        assert!(store.get("S", "D").unwrap().sync);

        let written = to_json(store, "", &[]).unwrap();
        assert!(!written.contains("sync_qty"));
    }

    #[test]
    fn test_legacy_notes_and_missing_fields() {
        let json = r#"{
            "user_name": "Eva",
            "items": [],
            "notes": ["plain note", {"state": 0, "text": "off"}, {"state": true, "text": "on"}]
        }"#;
        let loaded = from_json(json, LedgerConfig::default()).unwrap();
        assert_eq!(loaded.user_name, "Eva");
        assert_eq!(
            loaded.notes,
            vec![Note::new("plain note"), Note::unchecked("off"), Note::new("on")]
        );
        assert_eq!(Note::exportable(&loaded.notes), vec!["plain note", "on"]);

        let empty = from_json("{}", LedgerConfig::default()).unwrap();
        assert!(empty.basket.is_empty());
        assert!(from_json("\"text\"", LedgerConfig::default()).is_err());
    }

    #[test]
    fn test_loaded_items_become_originals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basket.json");
        let mut store = sample_store();
        save(&path, &mut store, "", &[]).unwrap();

        let mut loaded = load(&path).basket;
        assert!(!loaded.can_undo());
        assert!(!loaded.is_modified());

        loaded
            .update_item("Kabeláž", "Kábel UTP", ItemEdit::PocetMaterialu(7))
            .unwrap();
        assert!(loaded.reset_item("Kabeláž", "Kábel UTP"));
        assert_eq!(loaded.get("Kabeláž", "Kábel UTP").unwrap().pocet_materialu, 120);
    }

    #[test]
    fn test_document_order_is_preserved() {
        let mut store = BasketStore::new();
        for (section, produkt) in [("Z", "b"), ("A", "z"), ("Z", "a"), ("M", "m")] {
            store.add_item(
                CatalogRow {
                    produkt: produkt.to_string(),
                    koeficient_material: 1.0,
                    koeficient_prace: 1.0,
                    ..Default::default()
                },
                Some(section),
            );
        }

        let json = to_json(&store, "", &[]).unwrap();
        let loaded = from_json(&json, LedgerConfig::default()).unwrap();
        let order: Vec<_> = loaded
            .basket
            .sections()
            .iter()
            .flat_map(|s| s.iter().map(move |(p, _)| format!("{}/{}", s.name, p)))
            .collect();
        assert_eq!(order, vec!["Z/b", "Z/a", "A/z", "M/m"]);
    }

    #[test]
    fn test_json_basket_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonBasketFile::new(
            dir.path().join("basket.json"),
            LedgerConfig {
                history_limit: Some(5),
                ..Default::default()
            },
        );
        let mut store = sample_store();

        file.save(&mut store, "Peter", &[Note::new("x")]).unwrap();
        let loaded = file.load();
        assert_eq!(loaded.user_name, "Peter");
        assert_eq!(loaded.basket.item_count(), 2);
        assert_eq!(loaded.basket.config().history_limit, Some(5));
        assert!(file.path().exists());
    }

    #[test]
    fn test_default_file_name() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        assert_eq!(default_file_name(now), "basket_2024-03-09_14-05-07.json");
    }
}
