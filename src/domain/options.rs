//! Selectable address options, grouped into buckets by type tag

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single entry of the picker list
///
/// Section headers carry no address (`value == None`) and are not selectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyringOption {
    /// Unique key (the address, or a `header:` key for headers)
    pub key: String,
    /// Address, `None` for section headers
    pub value: Option<String>,
    /// Display label
    pub name: String,
    pub is_header: bool,
}

impl KeyringOption {
    pub fn header(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: format!("header:{}", name.to_lowercase()),
            value: None,
            name,
            is_header: true,
        }
    }

    pub fn address(address: impl Into<String>, name: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            key: address.clone(),
            value: Some(address),
            name: name.into(),
            is_header: false,
        }
    }

    /// Option for an address the registry knows nothing about
    pub fn synthesized(address: impl Into<String>) -> Self {
        let address = address.into();
        let name = crate::domain::address::shorten(&address);
        Self::address(address, name)
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

/// Type tag partitioning the option universe into buckets
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum OptionType {
    #[serde(rename = "account")]
    Account,
    #[serde(rename = "address")]
    Address,
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "allPlus")]
    AllPlus,
    #[serde(rename = "recent")]
    Recent,
    #[serde(rename = "testing")]
    Testing,
}

impl OptionType {
    pub const ALL: [OptionType; 6] = [
        OptionType::All,
        OptionType::AllPlus,
        OptionType::Account,
        OptionType::Address,
        OptionType::Recent,
        OptionType::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Account => "account",
            OptionType::Address => "address",
            OptionType::All => "all",
            OptionType::AllPlus => "allPlus",
            OptionType::Recent => "recent",
            OptionType::Testing => "testing",
        }
    }

    /// `allPlus` admits any valid address, listed or not
    pub fn is_unrestricted(&self) -> bool {
        *self == OptionType::AllPlus
    }

    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "account" => Ok(OptionType::Account),
            "address" => Ok(OptionType::Address),
            "all" => Ok(OptionType::All),
            "allPlus" | "allplus" | "all-plus" => Ok(OptionType::AllPlus),
            "recent" => Ok(OptionType::Recent),
            "testing" => Ok(OptionType::Testing),
            other => Err(format!("unknown option type: {other}")),
        }
    }
}

/// Snapshot of every bucket, keyed by type tag
pub type OptionBuckets = BTreeMap<OptionType, Vec<KeyringOption>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Include,
    Exclude,
}

/// Allow/deny list applied to a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionFilter {
    pub values: BTreeSet<String>,
    pub mode: FilterMode,
}

impl OptionFilter {
    pub fn include<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            mode: FilterMode::Include,
        }
    }

    pub fn exclude<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            mode: FilterMode::Exclude,
        }
    }

    /// Same filter with every value re-encoded under `prefix`; undecodable values are dropped
    pub fn canonicalized(&self, prefix: u16) -> Self {
        Self {
            values: self
                .values
                .iter()
                .filter_map(|value| crate::domain::address::canonicalize_str(value, prefix))
                .collect(),
            mode: self.mode,
        }
    }

    /// Headers always pass; addresses pass per mode
    pub fn admits(&self, option: &KeyringOption) -> bool {
        let Some(value) = option.value.as_deref() else {
            return true;
        };
        match self.mode {
            FilterMode::Include => self.values.contains(value),
            FilterMode::Exclude => !self.values.contains(value),
        }
    }
}

/// Drop repeated keys, keeping the first occurrence and the original order
pub fn dedupe(options: &[KeyringOption]) -> Vec<KeyringOption> {
    let mut seen = BTreeSet::new();
    options
        .iter()
        .filter(|option| seen.insert(option.key.clone()))
        .cloned()
        .collect()
}
