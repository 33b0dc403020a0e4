use std::fs;
use std::path::PathBuf;

use icebound_core::Flavor;
use icebound_persistence::{SaveError, SaveStore};
use icebound_session::{Match, MatchSetup};
use icebound_strategy::StrategyCatalog;

struct TempStore {
    root: PathBuf,
    store: SaveStore,
}

impl TempStore {
    fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!("icebound-{}-{tag}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        Self {
            store: SaveStore::new(&root),
            root,
        }
    }
}

impl Drop for TempStore {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn started_match() -> Match {
    let mut game = Match::new(
        StrategyCatalog::standard(),
        MatchSetup::solo(Flavor::Chocolate, 17),
    )
    .expect("solo setup is valid");
    game.start_level(1).expect("level 1 exists");
    game
}

#[test]
fn a_saved_match_loads_back_identically() {
    let temp = TempStore::new("round-trip");
    let catalog = StrategyCatalog::standard();
    let mut game = started_match();
    game.add_score(35);
    game.tick(std::time::Duration::from_millis(800));

    temp.store.save("slot-a", &game).expect("save succeeds");
    let loaded = temp.store.load("slot-a", &catalog).expect("load succeeds");

    assert_eq!(loaded.snapshot(), game.snapshot());
    assert_eq!(loaded.score(), 35);
}

#[test]
fn saving_twice_replaces_the_previous_save() {
    let temp = TempStore::new("replace");
    let catalog = StrategyCatalog::standard();
    let mut game = started_match();

    temp.store.save("slot", &game).expect("first save");
    game.add_score(99);
    temp.store.save("slot", &game).expect("second save");

    let loaded = temp.store.load("slot", &catalog).expect("load succeeds");
    assert_eq!(loaded.score(), 99);
}

#[test]
fn a_deleted_save_is_gone() {
    let temp = TempStore::new("delete");
    let catalog = StrategyCatalog::standard();
    let mut game = started_match();
    game.add_score(150);

    temp.store.save("save1", &game).expect("save succeeds");
    assert!(temp.store.exists("save1"));

    temp.store.delete("save1").expect("delete succeeds");
    assert!(!temp.store.exists("save1"));
    assert!(matches!(
        temp.store.load("save1", &catalog),
        Err(SaveError::MissingSave(id)) if id == "save1"
    ));
}

#[test]
fn deleting_a_missing_save_fails() {
    let temp = TempStore::new("delete-missing");
    assert!(matches!(
        temp.store.delete("nothing"),
        Err(SaveError::MissingSave(_))
    ));
}

#[test]
fn a_version_mismatched_save_is_refused() {
    let temp = TempStore::new("version");
    let game = started_match();
    temp.store.save("slot", &game).expect("save succeeds");

    let path = temp.root.join("slot.save");
    let body = fs::read_to_string(&path).expect("read save");
    let rewritten = body.replacen("icebound:v1", "icebound:v9", 1);
    fs::write(&path, rewritten).expect("rewrite save");

    assert!(matches!(
        temp.store.load("slot", &StrategyCatalog::standard()),
        Err(SaveError::UnsupportedVersion(header)) if header == "icebound:v9"
    ));
}

#[test]
fn a_corrupt_payload_is_refused() {
    let temp = TempStore::new("corrupt");
    let game = started_match();
    temp.store.save("slot", &game).expect("save succeeds");

    let path = temp.root.join("slot.save");
    fs::write(&path, "icebound:v1\nnot json at all\n").expect("rewrite save");

    assert!(matches!(
        temp.store.load("slot", &StrategyCatalog::standard()),
        Err(SaveError::Corrupt(_))
    ));
}

#[test]
fn traversal_identifiers_are_rejected_before_touching_disk() {
    let temp = TempStore::new("traversal");
    let game = started_match();
    assert!(matches!(
        temp.store.save("../escape", &game),
        Err(SaveError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        temp.store.load("../escape", &StrategyCatalog::standard()),
        Err(SaveError::InvalidIdentifier(_))
    ));
}
