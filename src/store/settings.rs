//! SQLite-backed key/value settings

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::preferences::{InputAddressPrefs, PreferenceStore, PREFERENCES_KEY};

/// Namespaced key/value table, one JSON document per key
#[derive(Debug)]
pub struct SettingsStore {
    conn: Connection,
}

impl SettingsStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory().context("open in-memory db")?,
        };
        store.init()?;
        Ok(store)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl PreferenceStore for SettingsStore {
    fn load(&self) -> InputAddressPrefs {
        match self.get(PREFERENCES_KEY) {
            Ok(Some(raw)) => InputAddressPrefs::parse(&raw),
            Ok(None) => InputAddressPrefs::default(),
            Err(err) => {
                log::warn!("failed to read preferences: {err:#}");
                InputAddressPrefs::default()
            }
        }
    }

    fn save(&mut self, prefs: &InputAddressPrefs) -> Result<()> {
        self.set(PREFERENCES_KEY, &prefs.to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options::OptionType;

    #[test]
    fn test_set_overwrites_existing_key() {
        let store = SettingsStore::open_in_memory().unwrap();
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("theme", "dark").unwrap();
        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
        let rows: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_preferences_share_one_key() {
        let mut store = SettingsStore::open_in_memory().unwrap();
        store.set_last_value(OptionType::All, "5A1").unwrap();
        store.set_last_value(OptionType::Account, "5B1").unwrap();

        let raw = store.get(PREFERENCES_KEY).unwrap().unwrap();
        let prefs = InputAddressPrefs::parse(&raw);
        assert_eq!(prefs.defaults.len(), 2);
        assert_eq!(store.last_value(OptionType::All).as_deref(), Some("5A1"));
    }

    #[test]
    fn test_corrupt_document_is_ignored() {
        let mut store = SettingsStore::open_in_memory().unwrap();
        store.set(PREFERENCES_KEY, "{{{").unwrap();
        assert_eq!(store.last_value(OptionType::All), None);

        store.set_last_value(OptionType::All, "5A1").unwrap();
        assert_eq!(store.last_value(OptionType::All).as_deref(), Some("5A1"));
    }
}
