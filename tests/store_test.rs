//! Persistence across process restarts (SQLite file on disk)

use std::path::Path;

use dotpick::domain::address::{encode, DEFAULT_PREFIX};
use dotpick::domain::{
    AddressBook, AddressOptionResolver, AddressRegistry, OptionType, PreferenceStore,
    ResolverProps,
};
use dotpick::store::{AddressStore, SettingsStore};
use tempfile::TempDir;

const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

fn open_registry(path: &Path, prefix: u16) -> AddressRegistry {
    AddressRegistry::with_store(prefix, AddressStore::open(path).unwrap()).unwrap()
}

#[test]
fn test_last_value_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dotpick.sqlite3");

    {
        let mut settings = SettingsStore::open(&path).unwrap();
        let mut registry = open_registry(&path, DEFAULT_PREFIX);
        registry.add_development_accounts();
        let mut resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let props = ResolverProps::default();
        let snapshot = registry.snapshot();
        assert_eq!(
            resolver.on_change(ALICE, &snapshot, &props, &mut settings).as_deref(),
            Some(ALICE)
        );
    }

    let settings = SettingsStore::open(&path).unwrap();
    assert_eq!(settings.last_value(OptionType::All).as_deref(), Some(ALICE));
    let raw = settings.get("options:InputAddress").unwrap().unwrap();
    assert!(raw.contains("\"defaults\""));
    assert!(raw.contains("\"all\""));
}

#[test]
fn test_recent_addresses_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dotpick.sqlite3");
    let typed = encode(&[42u8; 32], DEFAULT_PREFIX).unwrap();

    {
        let mut registry = open_registry(&path, DEFAULT_PREFIX);
        registry.add_contact(ALICE, "alice").unwrap();
        assert!(registry.save_recent(&typed).is_some());
    }

    let registry = open_registry(&path, DEFAULT_PREFIX);
    let contact = registry.lookup(ALICE).unwrap();
    assert_eq!(contact.name, "alice");
    assert!(!contact.is_recent());
    assert!(registry.lookup(&typed).unwrap().is_recent());

    let snapshot = registry.snapshot();
    assert_eq!(snapshot[&OptionType::Recent].len(), 2);
    assert_eq!(snapshot[&OptionType::Address].len(), 4);
}

#[test]
fn test_stored_rows_follow_configured_prefix() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dotpick.sqlite3");

    {
        let mut registry = open_registry(&path, DEFAULT_PREFIX);
        registry.add_contact(ALICE, "alice").unwrap();
    }

    // Reopened under Polkadot's prefix: same key, re-encoded
    let registry = open_registry(&path, 0);
    let polkadot = "15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5";
    assert_eq!(registry.lookup(ALICE).unwrap().address, polkadot);
}

#[test]
fn test_settings_and_addresses_share_one_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dotpick.sqlite3");

    let settings = SettingsStore::open(&path).unwrap();
    let addresses = AddressStore::open(&path).unwrap();
    settings.set("theme", "dark").unwrap();
    assert!(addresses.load_all().unwrap().is_empty());
    assert_eq!(settings.get("theme").unwrap().as_deref(), Some("dark"));
}
