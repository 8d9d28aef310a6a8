//! YAML Storage Integration Tests
//!
//! Tests for the YAML file format of `FileStore`:
//! - File naming and on-disk content
//! - Every native type surviving a reopen
//! - Removals reaching the file

#![cfg(feature = "yaml")]

mod common;

use common::{Person, SomeEnum};
use rprefs::{FileStore, FileStoreConfig, PreferenceStore, Preferences, YamlStorage};
use std::collections::BTreeSet;
use std::sync::Arc;
use tempfile::TempDir;

fn open(dir: &TempDir) -> (Arc<FileStore<YamlStorage>>, Preferences) {
    let config = FileStoreConfig::builder("test-app")
        .config_dir(dir.path())
        .build_with(YamlStorage::new());
    let store = Arc::new(FileStore::open(config).unwrap());
    let prefs = Preferences::new(store.clone());
    (store, prefs)
}

#[test]
fn test_yaml_file_is_created() {
    let temp_dir = TempDir::new().unwrap();
    let (store, prefs) = open(&temp_dir);

    prefs.string("token_key", "").unwrap().set("abc".into()).unwrap();

    let settings_file = temp_dir.path().join("preferences.yaml");
    assert_eq!(store.path(), settings_file);
    assert!(settings_file.exists(), "Preferences file should be .yaml");

    let content: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&settings_file).unwrap()).unwrap();
    assert_eq!(content["token_key"]["type"].as_str(), Some("string"));
    assert_eq!(content["token_key"]["value"].as_str(), Some("abc"));
}

#[test]
fn test_yaml_roundtrip_all_types() {
    let temp_dir = TempDir::new().unwrap();
    let tags: BTreeSet<String> = ["a".to_string(), "b".to_string()].into();

    {
        let (_, prefs) = open(&temp_dir);
        prefs.boolean("flag", false).unwrap().set(true).unwrap();
        prefs.int("int", 0).unwrap().set(-4).unwrap();
        prefs.long("long", 0).unwrap().set(1 << 40).unwrap();
        prefs.float("float", 0.0).unwrap().set(0.5).unwrap();
        prefs.string_set("tags", BTreeSet::new()).unwrap().set(tags.clone()).unwrap();
        prefs
            .enumeration("ENUM", SomeEnum::Default)
            .unwrap()
            .set(SomeEnum::Nice)
            .unwrap();
        prefs
            .json_opt::<Person>("person")
            .unwrap()
            .set(Some(Person::new("Johny", 22)))
            .unwrap();
    }

    let (_, prefs) = open(&temp_dir);
    assert!(prefs.boolean("flag", false).unwrap().get().unwrap());
    assert_eq!(prefs.int("int", 0).unwrap().get().unwrap(), -4);
    assert_eq!(prefs.long("long", 0).unwrap().get().unwrap(), 1 << 40);
    assert_eq!(prefs.float("float", 0.0).unwrap().get().unwrap(), 0.5);
    assert_eq!(prefs.string_set("tags", BTreeSet::new()).unwrap().get().unwrap(), tags);
    assert_eq!(
        prefs.enumeration("ENUM", SomeEnum::Default).unwrap().get().unwrap(),
        SomeEnum::Nice
    );
    assert_eq!(
        prefs.json_opt::<Person>("person").unwrap().get().unwrap(),
        Some(Person::new("Johny", 22))
    );
}

#[test]
fn test_yaml_removal_is_persisted() {
    let temp_dir = TempDir::new().unwrap();

    {
        let (_, prefs) = open(&temp_dir);
        let age = prefs.long_opt("age_key").unwrap();
        age.set(Some(26)).unwrap();
        age.set(None).unwrap();
    }

    let (store, _) = open(&temp_dir);
    assert!(!store.contains("age_key").unwrap());
}
