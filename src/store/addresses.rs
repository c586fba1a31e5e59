use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

/// Row of the address book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAddress {
    pub address: String,
    pub name: String,
    pub is_recent: bool,
    /// Unix seconds
    pub added_at: i64,
}

#[derive(Debug)]
pub struct AddressStore {
    conn: Connection,
}

impl AddressStore {
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

    /// All rows, oldest first
    pub fn load_all(&self) -> Result<Vec<StoredAddress>> {
        let mut stmt = self.conn.prepare(
            "SELECT address, name, is_recent, added_at FROM addresses
             ORDER BY added_at, rowid",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(StoredAddress {
                address: row.get(0)?,
                name: row.get(1)?,
                is_recent: row.get(2)?,
                added_at: row.get(3)?,
            });
        }
        Ok(out)
    }

    pub fn save(&self, entry: &StoredAddress) -> Result<()> {
        self.conn.execute(
            "INSERT INTO addresses(address, name, is_recent, added_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(address) DO UPDATE SET name=excluded.name, is_recent=excluded.is_recent",
            params![entry.address, entry.name, entry.is_recent, entry.added_at],
        )?;
        Ok(())
    }

    pub fn remove(&self, address: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM addresses WHERE address = ?1", params![address])?;
        Ok(())
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS addresses (
                address   TEXT PRIMARY KEY,
                name      TEXT NOT NULL,
                is_recent INTEGER NOT NULL DEFAULT 0,
                added_at  INTEGER NOT NULL
            );",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(address: &str, is_recent: bool, added_at: i64) -> StoredAddress {
        StoredAddress {
            address: address.to_string(),
            name: address.to_lowercase(),
            is_recent,
            added_at,
        }
    }

    #[test]
    fn test_save_load_remove() {
        let store = AddressStore::open_in_memory().unwrap();
        store.save(&entry("5B1", true, 20)).unwrap();
        store.save(&entry("5A1", false, 10)).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].address, "5A1");
        assert!(all[1].is_recent);

        store.remove("5A1").unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_keeps_added_at() {
        let store = AddressStore::open_in_memory().unwrap();
        store.save(&entry("5A1", true, 10)).unwrap();
        let mut promoted = entry("5A1", false, 99);
        promoted.name = "alice".to_string();
        store.save(&promoted).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "alice");
        assert!(!all[0].is_recent);
        assert_eq!(all[0].added_at, 10);
    }
}
