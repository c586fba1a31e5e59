//! Last-used address per type tag
//!
//! Stored as one JSON document, `{"defaults": {"<type>": "<address>"}}`, under a
//! single namespaced key. The document has no version; anything that fails to
//! parse is treated as empty defaults.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::options::OptionType;

/// Storage key holding the preference document
pub const PREFERENCES_KEY: &str = "options:InputAddress";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAddressPrefs {
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

impl InputAddressPrefs {
    /// Parse a stored document, falling back to empty defaults
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<InputAddressPrefs>(raw) {
            Ok(prefs) => prefs,
            Err(err) => {
                log::warn!("ignoring malformed {PREFERENCES_KEY} document: {err}");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, option_type: OptionType) -> Option<&str> {
        self.defaults
            .get(option_type.as_str())
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Persisted store of last-used values
pub trait PreferenceStore {
    /// Read the whole document; never fails
    fn load(&self) -> InputAddressPrefs;

    /// Replace the whole document
    fn save(&mut self, prefs: &InputAddressPrefs) -> Result<()>;

    fn last_value(&self, option_type: OptionType) -> Option<String> {
        self.load().get(option_type).map(str::to_string)
    }

    /// Read-modify-write of a single type tag
    fn set_last_value(&mut self, option_type: OptionType, address: &str) -> Result<()> {
        let mut prefs = self.load();
        prefs
            .defaults
            .insert(option_type.as_str().to_string(), address.to_string());
        self.save(&prefs)
    }
}

/// Process-local preferences, used when no database is available
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    raw: Option<String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with a raw stored document (possibly malformed)
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self) -> InputAddressPrefs {
        self.raw
            .as_deref()
            .map(InputAddressPrefs::parse)
            .unwrap_or_default()
    }

    fn save(&mut self, prefs: &InputAddressPrefs) -> Result<()> {
        self.raw = Some(prefs.to_json()?);
        Ok(())
    }
}
