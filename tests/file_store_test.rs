//! File store integration tests
//!
//! Exercises accessors on top of a `FileStore`:
//! - Values surviving a reopen of the file
//! - On-disk layout of the JSON file
//! - Write failures surfacing as persistence errors

mod common;

use common::{Person, SomeEnum};
use rprefs::{Error, FileStore, FileStoreConfig, PreferenceStore, Preferences};
use std::sync::Arc;
use tempfile::TempDir;

fn open(dir: &TempDir) -> (Arc<FileStore>, Preferences) {
    let config = FileStoreConfig::builder("test-app")
        .config_dir(dir.path())
        .build();
    let store = Arc::new(FileStore::open(config).unwrap());
    let prefs = Preferences::new(store.clone());
    (store, prefs)
}

#[test]
fn test_values_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let (_, prefs) = open(&temp_dir);
        prefs.string("token_key", "").unwrap().set("abc".into()).unwrap();
        prefs.long_opt("age_key").unwrap().set(Some(26)).unwrap();
        prefs
            .enumeration("ENUM", SomeEnum::Default)
            .unwrap()
            .set(SomeEnum::Nice)
            .unwrap();
        prefs
            .json("person", Person::new("stranger", 1))
            .unwrap()
            .set(Person::new("Johny", 22))
            .unwrap();
    }

    let (_, prefs) = open(&temp_dir);
    assert_eq!(prefs.string("token_key", "").unwrap().get().unwrap(), "abc");
    assert_eq!(prefs.long_opt("age_key").unwrap().get().unwrap(), Some(26));
    assert_eq!(
        prefs.enumeration("ENUM", SomeEnum::Default).unwrap().get().unwrap(),
        SomeEnum::Nice
    );
    assert_eq!(
        prefs
            .json("person", Person::new("stranger", 1))
            .unwrap()
            .get()
            .unwrap(),
        Person::new("Johny", 22)
    );
}

#[test]
fn test_json_file_layout() {
    let temp_dir = TempDir::new().unwrap();
    let (store, prefs) = open(&temp_dir);

    prefs.int("launches", 0).unwrap().set(3).unwrap();

    let path = temp_dir.path().join("preferences.json");
    assert_eq!(store.path(), path);

    let content: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        content,
        serde_json::json!({"launches": {"type": "int", "value": 3}})
    );
}

#[test]
fn test_null_removes_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let (_, prefs) = open(&temp_dir);

    let age = prefs.long_opt("age_key").unwrap();
    age.set(Some(26)).unwrap();
    age.set(None).unwrap();

    let (store, _) = open(&temp_dir);
    assert!(!store.contains("age_key").unwrap());
}

#[test]
fn test_observable_over_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let (_, prefs) = open(&temp_dir);

    let token = prefs.string("token_key", "").unwrap().observable();
    let changes = token.changes().unwrap();
    token.set("abc".into()).unwrap();

    let seen: Vec<String> = changes.try_iter().collect();
    assert_eq!(seen, ["", "abc"]);

    let (store, _) = open(&temp_dir);
    assert_eq!(store.get_string("token_key").unwrap().as_deref(), Some("abc"));
}

#[cfg(unix)]
#[test]
fn test_write_failure_is_persistence_error() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let (_, prefs) = open(&temp_dir);
    let token = prefs.string("token_key", "").unwrap().observable();
    let changes = token.changes().unwrap();

    // Directory without write permission makes the temp file creation fail
    std::fs::set_permissions(temp_dir.path(), std::fs::Permissions::from_mode(0o500)).unwrap();
    let canary = temp_dir.path().join("canary");
    let writable = std::fs::write(&canary, "x").is_ok();
    let result = token.set("abc".into());
    std::fs::set_permissions(temp_dir.path(), std::fs::Permissions::from_mode(0o700)).unwrap();

    // Running as root ignores directory permissions
    if writable {
        return;
    }

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Persistence { ref key, .. } if key == "token_key"));
    assert_eq!(token.get().unwrap(), "");
    let seen: Vec<String> = changes.try_iter().collect();
    assert_eq!(seen, [""]);
}
