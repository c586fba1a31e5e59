use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::chains::Network;
use crate::domain::address::MAX_PREFIX;
use crate::domain::{FilterMode, OptionFilter, OptionType};

#[derive(Debug, Clone, Deserialize)]
pub struct AccountSpec {
    pub address: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterSpec {
    pub mode: FilterMode,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: Network,

    /// Overrides the network's prefix
    pub ss58_prefix: Option<u16>,

    pub default_type: Option<OptionType>,

    #[serde(default)]
    pub dev_accounts: bool,

    #[serde(default)]
    pub accounts: Vec<AccountSpec>,

    /// Address book entries
    #[serde(default)]
    pub addresses: Vec<AccountSpec>,

    pub filter: Option<FilterSpec>,

    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

impl AccountSpec {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| crate::domain::address::shorten(&self.address))
    }
}

impl FilterSpec {
    pub fn to_filter(&self) -> OptionFilter {
        OptionFilter {
            values: self
                .values
                .iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect(),
            mode: self.mode,
        }
    }
}

impl Config {
    pub fn ss58_prefix(&self) -> u16 {
        self.ss58_prefix
            .filter(|prefix| *prefix <= MAX_PREFIX)
            .unwrap_or_else(|| self.network.ss58_prefix())
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content)
}

pub fn parse(content: &str) -> Config {
    match toml::from_str::<Config>(content) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("ignoring invalid config: {err}");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("DOTPICK_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("dotpick").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("dotpick").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "dotpick", "dotpick")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("dotpick"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("dotpick"));
    }
    directories::ProjectDirs::from("io", "dotpick", "dotpick")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("dotpick.sqlite3"))
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("dotpick.log"))
}
