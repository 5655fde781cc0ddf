//! On-disk document layout of the collection store.

use std::fs;

use pokecatch_store::keys;
use pokecatch_types::{CreatureRecord, CreatureType, SpeciesId};

use crate::common::file_store;

fn charmander() -> CreatureRecord {
    CreatureRecord {
        id: SpeciesId::new(4),
        name: "charmander".to_string(),
        localized_name: "Salamèche".to_string(),
        sprite: "https://img.test/4.png".to_string(),
        sprite_rare: "https://img.test/shiny/4.png".to_string(),
        types: vec![CreatureType::Fire],
        is_rare: true,
        cry: None,
        is_favorite: false,
        captured_at: None,
    }
}

fn read_json(dir: &std::path::Path, key: &str) -> serde_json::Value {
    let raw = fs::read_to_string(dir.join(format!("{key}.json"))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn documents_use_stable_keys_and_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = file_store(dir.path());

    assert!(store.add_to_roster(&charmander()).unwrap());
    store.record_capture(SpeciesId::new(4)).unwrap();
    store.record_encounter(SpeciesId::new(4)).unwrap();
    store.increment_encounter_counter().unwrap();
    store.increment_capture_counter().unwrap();

    let roster = read_json(dir.path(), keys::ROSTER);
    let entry = &roster[0];
    assert_eq!(entry["id"], 4);
    assert_eq!(entry["localizedName"], "Salamèche");
    assert_eq!(entry["spriteRare"], "https://img.test/shiny/4.png");
    assert_eq!(entry["isRare"], true);
    assert!(entry["capturedAt"].is_i64());

    assert_eq!(read_json(dir.path(), keys::CAPTURED), serde_json::json!([4]));
    assert_eq!(read_json(dir.path(), keys::ENCOUNTERED), serde_json::json!([4]));
    assert_eq!(
        read_json(dir.path(), keys::COUNTERS),
        serde_json::json!({"totalEncounters": 1, "totalCaptures": 1})
    );
}

#[test]
fn malformed_document_reads_as_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(format!("{}.json", keys::ROSTER)), "{not json").unwrap();

    let mut store = file_store(dir.path());
    assert!(store.roster().is_empty());

    store.add_to_roster(&charmander()).unwrap();
    assert_eq!(file_store(dir.path()).roster().len(), 1);
}

#[test]
fn legacy_field_names_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = serde_json::json!([{
        "id": 25,
        "name": "pikachu",
        "nameFr": "Pikachu",
        "sprite": "s",
        "spriteShiny": "ss",
        "types": ["electric"],
        "isShiny": false,
        "capturedAt": 1_700_000_000_000_i64
    }]);
    fs::write(
        dir.path().join(format!("{}.json", keys::ROSTER)),
        legacy.to_string(),
    )
    .unwrap();

    let roster = file_store(dir.path()).roster();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].localized_name, "Pikachu");
    assert_eq!(roster[0].sprite_rare, "ss");
    assert_eq!(roster[0].types, vec![CreatureType::Electric]);
}
