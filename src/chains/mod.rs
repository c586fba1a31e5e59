//! Network metadata and public RPC endpoints

mod kusama;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::EndpointConfig;

pub use kusama::{kusama_parachains, kusama_relay};

/// Networks the picker knows how to encode addresses for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Polkadot,
    #[default]
    Kusama,
    Westend,
    Substrate,
}

impl Network {
    pub fn ss58_prefix(&self) -> u16 {
        match self {
            Network::Polkadot => 0,
            Network::Kusama => 2,
            Network::Westend | Network::Substrate => 42,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Polkadot => "polkadot",
            Network::Kusama => "kusama",
            Network::Westend => "westend",
            Network::Substrate => "substrate",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "polkadot" | "dot" => Ok(Network::Polkadot),
            "kusama" | "ksm" => Ok(Network::Kusama),
            "westend" | "wnd" => Ok(Network::Westend),
            "substrate" | "generic" => Ok(Network::Substrate),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

/// A chain and the public providers serving it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointOption {
    /// Short identifier, e.g. "kusama" or "karura"
    pub info: &'static str,
    /// Display name
    pub text: &'static str,
    /// `None` for the relay chain
    pub para_id: Option<u32>,
    /// (provider, wss url)
    pub providers: &'static [(&'static str, &'static str)],
}

impl EndpointOption {
    pub fn urls(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.providers.iter().map(|(_, url)| *url)
    }

    pub fn is_relay(&self) -> bool {
        self.para_id.is_none()
    }
}

pub fn find_parachain(para_id: u32) -> Option<&'static EndpointOption> {
    kusama_parachains()
        .iter()
        .find(|option| option.para_id == Some(para_id))
}

pub fn find_by_info(info: &str) -> Option<&'static EndpointOption> {
    let info = info.trim().to_lowercase();
    std::iter::once(kusama_relay())
        .chain(kusama_parachains().iter())
        .find(|option| option.info.to_lowercase() == info)
}

/// A labelled endpoint, as printed by `--list-endpoints`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    pub label: String,
    pub url: String,
}

/// Configured endpoints first, then the built-in catalog; duplicate urls dropped
pub fn endpoint_listing(extra: &[EndpointConfig]) -> Vec<RpcEndpoint> {
    let mut seen = BTreeSet::<String>::new();
    let mut endpoints = Vec::new();
    let mut push = |label: String, url: &str| {
        let url = url.trim();
        if url.is_empty() || !seen.insert(url.to_lowercase()) {
            return;
        }
        endpoints.push(RpcEndpoint {
            label,
            url: url.to_string(),
        });
    };

    for entry in extra {
        let Some(url) = entry.url.as_deref() else {
            continue;
        };
        let label = entry
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "custom".to_string());
        push(label, url);
    }
    for chain in std::iter::once(kusama_relay()).chain(kusama_parachains().iter()) {
        for (provider, url) in chain.providers {
            push(format!("{} via {}", chain.text, provider), url);
        }
    }
    endpoints
}
