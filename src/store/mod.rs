//! Local persistence (SQLite)

mod addresses;
mod settings;

pub use addresses::{AddressStore, StoredAddress};
pub use settings::SettingsStore;
