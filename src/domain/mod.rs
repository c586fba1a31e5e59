//! Domain layer - address picking independent of the terminal front-end
//!
//! - `address`: SS58 canonicalization
//! - `options`: option entries, type tags, filters
//! - `preferences`: last-used value per type tag
//! - `registry`: known addresses and live bucket snapshots
//! - `resolver`: derives picker state from the above

pub mod address;
pub mod options;
pub mod preferences;
pub mod registry;
pub mod resolver;

pub use options::{FilterMode, KeyringOption, OptionBuckets, OptionFilter, OptionType};
pub use preferences::{MemoryPreferences, PreferenceStore};
pub use registry::{AddressBook, AddressKind, AddressMeta, AddressRegistry, Subscription};
pub use resolver::{
    AddressOptionResolver, Resolution, ResolvedState, ResolverProps, Selection, ValueInput,
};
