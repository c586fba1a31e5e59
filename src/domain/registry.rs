//! Address registry - known accounts, contacts and recently typed addresses
//!
//! The registry owns the option buckets. Every mutation rebuilds an immutable
//! snapshot and pushes it to live subscribers.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, Weak};

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::address::{canonicalize, canonicalize_str, AddressInput};
use super::options::{KeyringOption, OptionBuckets, OptionType};
use crate::store::{AddressStore, StoredAddress};

/// Well-known development keys (sr25519 `//Name` derivations)
const DEV_ACCOUNTS: [(&str, &str); 6] = [
    ("Alice", "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d"),
    ("Bob", "8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48"),
    ("Charlie", "90b5ab205c6974c9ea841be688864633dc9ca8a357843eeacf2314649965fe22"),
    ("Dave", "306721211d5404bd9da88e0204360a1a9ab8b87c66c1bc2fcdd37f3c2222cc20"),
    ("Eve", "e659a7a1628cdd93febc04a4e0646ea20e9f5f0ce097d9a05290d4a9e054df4e"),
    ("Ferdie", "1cbd2d43530a44705ad088af313e18f80b53ef16b36177cd4b77b846f2a5f07c"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// Accounts the user controls
    Account,
    /// Development keys
    Development,
    /// Address book entries
    Contact,
    /// Typed-in addresses seen during search
    Recent,
}

/// Display metadata for a known address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMeta {
    pub address: String,
    pub name: String,
    pub kind: AddressKind,
    pub added_at: Option<DateTime<Utc>>,
}

impl AddressMeta {
    pub fn is_recent(&self) -> bool {
        self.kind == AddressKind::Recent
    }
}

/// Lookup and registration surface used by the resolver
pub trait AddressBook {
    fn lookup(&self, address: &str) -> Option<AddressMeta>;

    /// Register an address as recently seen and return its option
    fn save_recent(&mut self, address: &str) -> Option<KeyringOption>;

    /// Option for an address, named if the book knows it
    fn option_for(&self, address: &str) -> KeyringOption {
        match self.lookup(address) {
            Some(meta) => KeyringOption::address(address, meta.name),
            None => KeyringOption::synthesized(address),
        }
    }
}

type Subscribers = Mutex<BTreeMap<u64, Sender<Arc<OptionBuckets>>>>;

/// Live feed of bucket snapshots; unregisters itself when dropped
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: Receiver<Arc<OptionBuckets>>,
    subscribers: Weak<Subscribers>,
}

impl Subscription {
    /// Newest pending snapshot, if any arrived since the last call
    pub fn latest(&self) -> Option<Arc<OptionBuckets>> {
        self.receiver.try_iter().last()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            if let Ok(mut guard) = subscribers.lock() {
                guard.remove(&self.id);
            }
        }
    }
}

#[derive(Debug)]
pub struct AddressRegistry {
    prefix: u16,
    entries: Vec<AddressMeta>,
    store: Option<AddressStore>,
    snapshot: Arc<OptionBuckets>,
    subscribers: Arc<Subscribers>,
    next_subscriber: u64,
}

impl AddressRegistry {
    pub fn new(prefix: u16) -> Self {
        let mut registry = Self {
            prefix,
            entries: Vec::new(),
            store: None,
            snapshot: Arc::new(OptionBuckets::new()),
            subscribers: Arc::new(Mutex::new(BTreeMap::new())),
            next_subscriber: 0,
        };
        registry.rebuild();
        registry
    }

    /// Registry backed by a persistent address book
    pub fn with_store(prefix: u16, store: AddressStore) -> Result<Self> {
        let rows = store.load_all()?;
        let mut registry = Self::new(prefix);
        for row in rows {
            let Some(address) = canonicalize_str(&row.address, prefix) else {
                log::warn!("skipping stored address {}: not a valid address", row.address);
                continue;
            };
            let kind = if row.is_recent {
                AddressKind::Recent
            } else {
                AddressKind::Contact
            };
            registry.insert(AddressMeta {
                address,
                name: row.name,
                kind,
                added_at: DateTime::from_timestamp(row.added_at, 0),
            });
        }
        registry.store = Some(store);
        registry.publish();
        Ok(registry)
    }

    pub fn prefix(&self) -> u16 {
        self.prefix
    }

    pub fn entries(&self) -> &[AddressMeta] {
        &self.entries
    }

    /// Add an owned account; returns the canonical address
    pub fn add_account(&mut self, address: &str, name: &str) -> Option<String> {
        let address = canonicalize_str(address, self.prefix)?;
        self.insert(AddressMeta {
            address: address.clone(),
            name: name.to_string(),
            kind: AddressKind::Account,
            added_at: None,
        });
        self.publish();
        Some(address)
    }

    pub fn add_development_accounts(&mut self) {
        for (name, public) in DEV_ACCOUNTS {
            let Ok(bytes) = hex::decode(public) else {
                continue;
            };
            if let Some(address) = canonicalize(&AddressInput::Bytes(bytes), self.prefix) {
                self.insert(AddressMeta {
                    address,
                    name: name.to_string(),
                    kind: AddressKind::Development,
                    added_at: None,
                });
            }
        }
        self.publish();
    }

    /// Add (or rename) an address book entry
    pub fn add_contact(&mut self, address: &str, name: &str) -> Option<String> {
        let address = canonicalize_str(address, self.prefix)?;
        let meta = AddressMeta {
            address: address.clone(),
            name: name.to_string(),
            kind: AddressKind::Contact,
            added_at: Some(Utc::now()),
        };
        self.persist(&meta);
        self.entries.retain(|entry| entry.address != address);
        self.entries.push(meta);
        self.publish();
        Some(address)
    }

    /// Drop an address from the registry and the backing store
    pub fn forget(&mut self, address: &str) -> bool {
        let Some(address) = canonicalize_str(address, self.prefix) else {
            return false;
        };
        let before = self.entries.len();
        self.entries.retain(|entry| entry.address != address);
        if self.entries.len() == before {
            return false;
        }
        if let Some(store) = self.store.as_ref() {
            if let Err(err) = store.remove(&address) {
                log::warn!("failed to remove {address} from address book: {err:#}");
            }
        }
        self.publish();
        true
    }

    pub fn display_name(&self, address: &str) -> String {
        self.lookup(address)
            .map(|meta| meta.name)
            .unwrap_or_else(|| super::address::shorten(address))
    }

    pub fn snapshot(&self) -> Arc<OptionBuckets> {
        Arc::clone(&self.snapshot)
    }

    /// Register for snapshots; the current one is delivered immediately
    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        let _ = tx.send(self.snapshot());
        if let Ok(mut guard) = self.subscribers.lock() {
            guard.insert(id, tx);
        }
        Subscription {
            id,
            receiver: rx,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    fn insert(&mut self, meta: AddressMeta) {
        // First registration wins; an account never turns into a recent
        if self.entries.iter().any(|entry| entry.address == meta.address) {
            return;
        }
        self.entries.push(meta);
    }

    fn persist(&self, meta: &AddressMeta) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let row = StoredAddress {
            address: meta.address.clone(),
            name: meta.name.clone(),
            is_recent: meta.is_recent(),
            added_at: meta.added_at.unwrap_or_else(Utc::now).timestamp(),
        };
        if let Err(err) = store.save(&row) {
            log::warn!("failed to persist {}: {err:#}", meta.address);
        }
    }

    fn publish(&mut self) {
        self.rebuild();
        let snapshot = self.snapshot();
        if let Ok(mut guard) = self.subscribers.lock() {
            guard.retain(|_, tx| tx.send(Arc::clone(&snapshot)).is_ok());
        }
    }

    fn rebuild(&mut self) {
        let section = |kind: AddressKind, title: &str| -> Vec<KeyringOption> {
            let items: Vec<KeyringOption> = self
                .entries
                .iter()
                .filter(|entry| entry.kind == kind)
                .map(|entry| KeyringOption::address(entry.address.clone(), entry.name.clone()))
                .collect();
            if items.is_empty() {
                return items;
            }
            let mut out = Vec::with_capacity(items.len() + 1);
            out.push(KeyringOption::header(title));
            out.extend(items);
            out
        };

        let accounts = section(AddressKind::Account, "Accounts");
        let development = section(AddressKind::Development, "Development");
        let contacts = section(AddressKind::Contact, "Addresses");
        let recent = section(AddressKind::Recent, "Recent");

        let account: Vec<KeyringOption> = accounts.into_iter().chain(development.clone()).collect();
        let address: Vec<KeyringOption> = contacts.into_iter().chain(recent.clone()).collect();
        let all_plus: Vec<KeyringOption> = account.iter().chain(address.iter()).cloned().collect();

        let mut buckets = OptionBuckets::new();
        buckets.insert(OptionType::All, account.clone());
        buckets.insert(OptionType::AllPlus, all_plus);
        buckets.insert(OptionType::Account, account);
        buckets.insert(OptionType::Address, address);
        buckets.insert(OptionType::Recent, recent);
        buckets.insert(OptionType::Testing, development);
        self.snapshot = Arc::new(buckets);
    }
}

impl AddressBook for AddressRegistry {
    fn lookup(&self, address: &str) -> Option<AddressMeta> {
        let address = canonicalize_str(address, self.prefix)?;
        self.entries
            .iter()
            .find(|entry| entry.address == address)
            .cloned()
    }

    fn save_recent(&mut self, address: &str) -> Option<KeyringOption> {
        let address = canonicalize_str(address, self.prefix)?;
        if let Some(existing) = self.entries.iter().find(|entry| entry.address == address) {
            return Some(KeyringOption::address(
                existing.address.clone(),
                existing.name.clone(),
            ));
        }
        let meta = AddressMeta {
            address: address.clone(),
            name: super::address::shorten(&address),
            kind: AddressKind::Recent,
            added_at: Some(Utc::now()),
        };
        log::debug!("registered recent address {address}");
        self.persist(&meta);
        let option = KeyringOption::address(meta.address.clone(), meta.name.clone());
        self.entries.push(meta);
        self.publish();
        Some(option)
    }
}
