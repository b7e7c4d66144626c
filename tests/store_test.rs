//! Store tests for the in-memory and JSON-file implementations.

use lector::preferences::{ReadingMode, Theme};
use lector::store::MAX_SESSIONS;
use lector::{
    DocumentStore, Error, JsonStore, MemoryStore, ReadingSession, UNKNOWN_AUTHOR, UserPreferences,
    assemble, update_progress,
};
use serde_json::Value;
use tempfile::TempDir;

fn exercise_store(store: &mut dyn DocumentStore) {
    assert!(store.load_all().unwrap().is_empty());

    let first = assemble("one.txt", b"alpha beta gamma delta".to_vec()).unwrap();
    let second = assemble("two.md", b"# Two\n\nwords".to_vec()).unwrap();
    store.upsert(&first).unwrap();
    store.upsert(&second).unwrap();
    assert_eq!(store.load_all().unwrap().len(), 2);

    let updated = update_progress(&mut *store, &first.id, 2).unwrap().unwrap();
    assert_eq!(updated.current_position, 2);
    assert_eq!(updated.reading_progress, 50);

    let all = store.load_all().unwrap();
    assert_eq!(all.len(), 2, "upsert replaces, never duplicates");
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[0].current_position, 2);
    assert!(all[0].last_read > 0);

    assert!(update_progress(&mut *store, "missing", 1).unwrap().is_none());

    assert!(store.delete(&second.id).unwrap());
    assert!(!store.delete(&second.id).unwrap());
    assert_eq!(store.load(&first.id).unwrap().unwrap().title, "one");
    assert!(store.load(&second.id).unwrap().is_none());

    let prefs = UserPreferences {
        default_speed: 475,
        theme: Theme::Forest,
        ..Default::default()
    };
    store.save_preferences(&prefs).unwrap();
    assert_eq!(store.load_preferences().unwrap(), prefs);

    for i in 0..(MAX_SESSIONS as u64 + 3) {
        let session = ReadingSession::new(&first.id, ReadingMode::Rsvp, (i, i + 60_000), (0, 10));
        store.record_session(session).unwrap();
    }
    let sessions = store.load_sessions().unwrap();
    assert_eq!(sessions.len(), MAX_SESSIONS);
    assert_eq!(sessions[0].start_time, 3);
    assert_eq!(sessions[0].average_speed, 10);
}

#[test]
fn test_memory_store() {
    exercise_store(&mut MemoryStore::new());
}

#[test]
fn test_json_store() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonStore::open(dir.path().join("library")).unwrap();
    exercise_store(&mut store);

    // a fresh handle sees the same data
    let reopened = JsonStore::open(store.dir()).unwrap();
    assert_eq!(reopened.load_all().unwrap().len(), 1);
    assert_eq!(reopened.load_preferences().unwrap().default_speed, 475);
    assert!(!dir.path().join("library/documents.json.tmp").exists());
}

#[test]
fn test_json_store_tolerates_corrupt_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("documents.json"), "{ not json").unwrap();
    std::fs::write(dir.path().join("preferences.json"), r#"{"defaultSpeed": 5, "theme": "sepia"}"#).unwrap();
    std::fs::write(dir.path().join("sessions.json"), "[]").unwrap();

    let mut store = JsonStore::open(dir.path()).unwrap();
    assert!(store.load_all().unwrap().is_empty());

    let prefs = store.load_preferences().unwrap();
    assert_eq!(prefs.default_speed, 100);
    assert_eq!(prefs.theme, Theme::Sepia);
    assert!(prefs.auto_save);

    // an unparseable library is left alone rather than overwritten
    let doc = assemble("fresh.txt", b"new text".to_vec()).unwrap();
    assert!(matches!(store.upsert(&doc), Err(Error::Store(_))));
    assert!(matches!(store.delete("anything"), Err(Error::Store(_))));
    let on_disk = std::fs::read_to_string(dir.path().join("documents.json")).unwrap();
    assert_eq!(on_disk, "{ not json");
}

#[test]
fn test_json_store_keeps_records_it_cannot_read() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonStore::open(dir.path()).unwrap();
    let first = assemble("one.txt", b"alpha beta".to_vec()).unwrap();
    let second = assemble("two.txt", b"gamma delta".to_vec()).unwrap();
    store.upsert(&first).unwrap();
    store.upsert(&second).unwrap();

    // an older writer left one record without an author and added one
    // with a format tag this version does not know
    let path = dir.path().join("documents.json");
    let mut records: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    records[0].as_object_mut().unwrap().remove("author");
    let mut alien = records[1].clone();
    alien["id"] = "alien".into();
    alien["format"] = "djvu".into();
    records.push(alien);
    std::fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, first.id);
    assert_eq!(loaded[0].author, UNKNOWN_AUTHOR);

    let third = assemble("three.txt", b"epsilon".to_vec()).unwrap();
    store.upsert(&third).unwrap();
    assert!(store.delete(&second.id).unwrap());

    let records: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![first.id.as_str(), "alien", third.id.as_str()]);
    assert_eq!(store.load_all().unwrap().len(), 2);
}
