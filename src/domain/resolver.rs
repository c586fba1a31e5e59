//! Address option resolution
//!
//! Given a bucket snapshot, the picker props and the persisted preferences,
//! the resolver derives the active address, the options to render and the
//! value handed to the selection widget. It also maps selection events and
//! free-text searches back onto addresses.
//!
//! The resolver keeps two pieces of state between calls: the last value for
//! the current type tag, and the value currently tracked by the widget. Both
//! change only on explicit selection events (or a controlled `value` prop),
//! never on snapshot refreshes.

use super::address::{canonicalize, canonicalize_str, is_valid, AddressInput};
use super::options::{dedupe, KeyringOption, OptionBuckets, OptionFilter, OptionType};
use super::preferences::PreferenceStore;
use super::registry::AddressBook;

/// Controlled value passed into the picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueInput {
    Single(AddressInput),
    Multiple(Vec<AddressInput>),
}

/// Picker inputs
#[derive(Debug, Clone)]
pub struct ResolverProps {
    pub option_type: OptionType,
    pub value: Option<ValueInput>,
    pub filter: Option<OptionFilter>,
    /// Explicit option list, bypassing the buckets
    pub options: Option<Vec<KeyringOption>>,
    pub is_disabled: bool,
    pub default_value: Option<AddressInput>,
    pub is_multiple: bool,
    /// Accept typed addresses that are not in the list
    pub is_input: bool,
}

impl Default for ResolverProps {
    fn default() -> Self {
        Self {
            option_type: OptionType::default(),
            value: None,
            filter: None,
            options: None,
            is_disabled: false,
            default_value: None,
            is_multiple: false,
            is_input: true,
        }
    }
}

/// Value handed to the selection widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(Option<String>),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedState {
    pub option_type: OptionType,
    pub active_value: Option<String>,
    pub last_value: Option<String>,
    /// Deduplicated and filtered bucket
    pub filtered: Vec<KeyringOption>,
    /// What the widget should list
    pub options: Vec<KeyringOption>,
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing to choose from: the "no accounts are available for selection" notice
    Unavailable,
    Ready(ResolvedState),
}

impl Resolution {
    pub fn state(&self) -> Option<&ResolvedState> {
        match self {
            Resolution::Unavailable => None,
            Resolution::Ready(state) => Some(state),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddressOptionResolver {
    prefix: u16,
    last_value: Option<(OptionType, String)>,
    tracked: Option<Selection>,
}

impl AddressOptionResolver {
    pub fn new(prefix: u16) -> Self {
        Self {
            prefix,
            last_value: None,
            tracked: None,
        }
    }

    pub fn prefix(&self) -> u16 {
        self.prefix
    }

    /// Derive the picker state for the current inputs
    pub fn resolve(
        &mut self,
        snapshot: &OptionBuckets,
        props: &ResolverProps,
        prefs: &dyn PreferenceStore,
        book: &dyn AddressBook,
    ) -> Resolution {
        let option_type = props.option_type;
        let bucket = snapshot
            .get(&option_type)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let has_options = props
            .options
            .as_ref()
            .is_some_and(|options| !options.is_empty())
            || !bucket.is_empty();
        if !has_options && !props.is_disabled {
            return Resolution::Unavailable;
        }

        if let Some(value) = props.value.as_ref() {
            self.track_value(value);
        }
        let last_value = self.last_value_for(option_type, prefs);
        let filter = self.filter_for(props);
        let filtered = filter_bucket(bucket, filter.as_ref());
        let active_value = self.active_value(props, &filtered, last_value.as_deref());

        let options = match (props.options.as_ref(), active_value.as_deref()) {
            (Some(explicit), _) => dedupe(explicit),
            (None, Some(active)) if props.is_disabled => vec![book.option_for(active)],
            (None, Some(active)) if !has_value(&filtered, active) => {
                let mut options = filtered.clone();
                options.push(book.option_for(active));
                options
            }
            _ => filtered.clone(),
        };

        let selection = if props.is_multiple {
            match self.tracked.as_ref() {
                Some(Selection::Multiple(values)) => Selection::Multiple(values.clone()),
                _ => Selection::Multiple(Vec::new()),
            }
        } else {
            match self.tracked.as_ref() {
                Some(Selection::Single(Some(value))) => Selection::Single(Some(value.clone())),
                _ => Selection::Single(active_value.clone()),
            }
        };

        Resolution::Ready(ResolvedState {
            option_type,
            active_value,
            last_value,
            filtered,
            options,
            selection,
        })
    }

    /// Single-select change; returns the address reported upward
    pub fn on_change(
        &mut self,
        address: &str,
        snapshot: &OptionBuckets,
        props: &ResolverProps,
        prefs: &mut dyn PreferenceStore,
    ) -> Option<String> {
        let address = address.trim();
        let option_type = props.option_type;

        if props.filter.is_none() {
            if let Err(err) = prefs.set_last_value(option_type, address) {
                log::warn!("failed to persist last {option_type} value: {err:#}");
            }
            self.last_value = Some((option_type, address.to_string()));
        }

        let reported = if address.is_empty() {
            None
        } else {
            let bucket = snapshot
                .get(&option_type)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let filtered = filter_bucket(bucket, self.filter_for(props).as_ref());
            if has_value(&filtered, address)
                || (option_type.is_unrestricted() && is_valid(address))
            {
                canonicalize_str(address, self.prefix)
            } else {
                None
            }
        };

        log::debug!("selection change ({option_type}): {address:?} -> {reported:?}");
        self.tracked = reported.clone().map(|value| Selection::Single(Some(value)));
        reported
    }

    /// Multi-select change; drops anything that is not an address
    pub fn on_change_multiple(&mut self, addresses: &[String]) -> Vec<String> {
        let reported: Vec<String> = addresses
            .iter()
            .filter_map(|address| canonicalize_str(address, self.prefix))
            .collect();
        self.tracked = Some(Selection::Multiple(reported.clone()));
        reported
    }

    /// Match a free-text query against the filtered options
    pub fn search(
        &self,
        filtered: &[KeyringOption],
        query: &str,
        is_input: bool,
        book: &mut dyn AddressBook,
    ) -> Vec<KeyringOption> {
        let query = query.trim();
        let needle = query.to_lowercase();

        let mut matches: Vec<KeyringOption> = filtered
            .iter()
            .filter(|option| {
                needle.is_empty()
                    || option.name.to_lowercase().contains(&needle)
                    || option
                        .value
                        .as_deref()
                        .map(|value| value.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .cloned()
            .collect();

        if is_input && matches.is_empty() {
            if let Some(address) = canonicalize_str(query, self.prefix) {
                if let Some(option) = book.save_recent(&address) {
                    matches.push(option);
                }
            }
        }

        // A header survives only when directly followed by a selectable entry
        let keep: Vec<bool> = (0..matches.len())
            .map(|index| {
                matches[index].has_value()
                    || matches
                        .get(index + 1)
                        .map(KeyringOption::has_value)
                        .unwrap_or(false)
            })
            .collect();
        matches
            .into_iter()
            .zip(keep)
            .filter_map(|(option, keep)| keep.then_some(option))
            .collect()
    }

    fn track_value(&mut self, value: &ValueInput) {
        match value {
            ValueInput::Single(input) => {
                if let Some(address) = canonicalize(input, self.prefix) {
                    self.tracked = Some(Selection::Single(Some(address)));
                }
            }
            ValueInput::Multiple(inputs) => {
                let values = inputs
                    .iter()
                    .filter_map(|input| canonicalize(input, self.prefix))
                    .collect();
                self.tracked = Some(Selection::Multiple(values));
            }
        }
    }

    fn last_value_for(
        &mut self,
        option_type: OptionType,
        prefs: &dyn PreferenceStore,
    ) -> Option<String> {
        if let Some((tag, value)) = self.last_value.as_ref() {
            if *tag == option_type {
                return Some(value.clone()).filter(|value| !value.is_empty());
            }
        }
        let value = prefs.last_value(option_type);
        if let Some(value) = value.as_ref() {
            self.last_value = Some((option_type, value.clone()));
        }
        value
    }

    /// Filter values re-encoded under the configured prefix
    fn filter_for(&self, props: &ResolverProps) -> Option<OptionFilter> {
        props
            .filter
            .as_ref()
            .map(|filter| filter.canonicalized(self.prefix))
    }

    fn active_value(
        &self,
        props: &ResolverProps,
        filtered: &[KeyringOption],
        last_value: Option<&str>,
    ) -> Option<String> {
        let default_value = props
            .default_value
            .as_ref()
            .and_then(|input| canonicalize(input, self.prefix));
        let default_applies = props.is_disabled
            || default_value
                .as_deref()
                .map(|value| has_value(filtered, value) || props.option_type.is_unrestricted())
                .unwrap_or(false);

        let from_default = default_applies.then_some(default_value).flatten();
        let from_last = last_value
            .filter(|value| has_value(filtered, value))
            .and_then(|value| canonicalize_str(value, self.prefix));
        let from_tail = filtered
            .last()
            .and_then(|option| option.value.as_deref())
            .and_then(|value| canonicalize_str(value, self.prefix));

        from_default.or(from_last).or(from_tail)
    }
}

/// Deduplicate a bucket and apply the optional filter
pub fn filter_bucket(bucket: &[KeyringOption], filter: Option<&OptionFilter>) -> Vec<KeyringOption> {
    dedupe(bucket)
        .into_iter()
        .filter(|option| filter.map(|filter| filter.admits(option)).unwrap_or(true))
        .collect()
}

/// Whether a selectable entry with this address exists
pub fn has_value(options: &[KeyringOption], address: &str) -> bool {
    options
        .iter()
        .any(|option| option.value.as_deref() == Some(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::address::DEFAULT_PREFIX;
    use crate::domain::preferences::MemoryPreferences;
    use crate::domain::registry::AddressRegistry;

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

    fn bucket(options: Vec<KeyringOption>) -> OptionBuckets {
        let mut buckets = OptionBuckets::new();
        buckets.insert(OptionType::All, options.clone());
        buckets.insert(OptionType::AllPlus, options);
        buckets
    }

    #[test]
    fn test_filter_bucket_dedupes_then_filters() {
        let options = vec![
            KeyringOption::header("Accounts"),
            KeyringOption::address(ALICE, "alice"),
            KeyringOption::address(ALICE, "alice again"),
            KeyringOption::address(BOB, "bob"),
        ];
        let filtered = filter_bucket(&options, Some(&OptionFilter::exclude([BOB])));
        assert_eq!(filtered.len(), 2);
        assert!(filtered[0].is_header);
        assert_eq!(filtered[1].name, "alice");
    }

    #[test]
    fn test_fallback_is_last_entry() {
        let mut resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let registry = AddressRegistry::new(DEFAULT_PREFIX);
        let prefs = MemoryPreferences::new();

        let snapshot = bucket(vec![
            KeyringOption::address(ALICE, "alice"),
            KeyringOption::address(BOB, "bob"),
        ]);
        let resolution = resolver.resolve(&snapshot, &ResolverProps::default(), &prefs, &registry);
        let state = resolution.state().unwrap();
        assert_eq!(state.active_value.as_deref(), Some(BOB));
        assert_eq!(state.selection, Selection::Single(Some(BOB.to_string())));

        // A trailing header leaves nothing selected
        let snapshot = bucket(vec![
            KeyringOption::address(ALICE, "alice"),
            KeyringOption::address(BOB, "bob"),
            KeyringOption::header("Trailing"),
        ]);
        let resolution = resolver.resolve(&snapshot, &ResolverProps::default(), &prefs, &registry);
        let state = resolution.state().unwrap();
        assert_eq!(state.active_value, None);
        assert_eq!(state.selection, Selection::Single(None));
    }

    #[test]
    fn test_empty_explicit_options_fall_back_to_bucket() {
        let snapshot = bucket(vec![KeyringOption::address(ALICE, "alice")]);
        let props = ResolverProps {
            options: Some(Vec::new()),
            ..ResolverProps::default()
        };
        let mut resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let registry = AddressRegistry::new(DEFAULT_PREFIX);
        let resolution = resolver.resolve(&snapshot, &props, &MemoryPreferences::new(), &registry);
        let state = resolution.state().unwrap();
        assert_eq!(state.active_value.as_deref(), Some(ALICE));
        assert!(state.options.is_empty());

        let empty = OptionBuckets::new();
        let resolution = resolver.resolve(&empty, &props, &MemoryPreferences::new(), &registry);
        assert_eq!(resolution, Resolution::Unavailable);
    }

    #[test]
    fn test_unavailable_when_bucket_empty() {
        let snapshot = OptionBuckets::new();
        let mut resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let registry = AddressRegistry::new(DEFAULT_PREFIX);
        let prefs = MemoryPreferences::new();

        let resolution = resolver.resolve(&snapshot, &ResolverProps::default(), &prefs, &registry);
        assert_eq!(resolution, Resolution::Unavailable);

        let disabled = ResolverProps {
            is_disabled: true,
            default_value: Some(ALICE.into()),
            ..ResolverProps::default()
        };
        let state = resolver.resolve(&snapshot, &disabled, &prefs, &registry);
        assert_eq!(state.state().unwrap().options.len(), 1);
    }

    #[test]
    fn test_explicit_options_used_verbatim() {
        let snapshot = bucket(vec![KeyringOption::address(ALICE, "alice")]);
        let props = ResolverProps {
            options: Some(vec![
                KeyringOption::address(BOB, "bob"),
                KeyringOption::address(BOB, "bob twice"),
            ]),
            ..ResolverProps::default()
        };
        let mut resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let registry = AddressRegistry::new(DEFAULT_PREFIX);
        let resolution = resolver.resolve(&snapshot, &props, &MemoryPreferences::new(), &registry);
        let state = resolution.state().unwrap();
        assert_eq!(state.options, vec![KeyringOption::address(BOB, "bob")]);
        assert_eq!(state.active_value.as_deref(), Some(ALICE));
    }

    #[test]
    fn test_multiple_starts_empty() {
        let snapshot = bucket(vec![KeyringOption::address(ALICE, "alice")]);
        let props = ResolverProps {
            is_multiple: true,
            ..ResolverProps::default()
        };
        let mut resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let registry = AddressRegistry::new(DEFAULT_PREFIX);
        let prefs = MemoryPreferences::new();
        let resolution = resolver.resolve(&snapshot, &props, &prefs, &registry);
        assert_eq!(resolution.state().unwrap().selection, Selection::Multiple(vec![]));

        let reported = resolver.on_change_multiple(&[
            ALICE.to_string(),
            "junk".to_string(),
            BOB.to_string(),
        ]);
        assert_eq!(reported, vec![ALICE.to_string(), BOB.to_string()]);
        let resolution = resolver.resolve(&snapshot, &props, &prefs, &registry);
        assert_eq!(
            resolution.state().unwrap().selection,
            Selection::Multiple(reported)
        );
        assert_eq!(prefs.last_value(OptionType::All), None);
    }

    #[test]
    fn test_controlled_value_is_tracked() {
        let snapshot = bucket(vec![
            KeyringOption::address(ALICE, "alice"),
            KeyringOption::address(BOB, "bob"),
        ]);
        let props = ResolverProps {
            value: Some(ValueInput::Single(ALICE.into())),
            ..ResolverProps::default()
        };
        let mut resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let registry = AddressRegistry::new(DEFAULT_PREFIX);
        let resolution = resolver.resolve(&snapshot, &props, &MemoryPreferences::new(), &registry);
        let state = resolution.state().unwrap();
        assert_eq!(state.active_value.as_deref(), Some(BOB));
        assert_eq!(state.selection, Selection::Single(Some(ALICE.to_string())));

        // Malformed controlled values degrade to "no value"
        let mut resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let props = ResolverProps {
            value: Some(ValueInput::Single("0xnothex".into())),
            ..ResolverProps::default()
        };
        let resolution = resolver.resolve(&snapshot, &props, &MemoryPreferences::new(), &registry);
        assert_eq!(
            resolution.state().unwrap().selection,
            Selection::Single(Some(BOB.to_string()))
        );
    }

    #[test]
    fn test_search_drops_orphan_headers() {
        let filtered = vec![
            KeyringOption::header("Accounts"),
            KeyringOption::address(ALICE, "alice"),
            KeyringOption::header("Addresses"),
            KeyringOption::address(BOB, "bob"),
            KeyringOption::header("Recent"),
        ];
        let resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let mut registry = AddressRegistry::new(DEFAULT_PREFIX);

        let all = resolver.search(&filtered, "  ", true, &mut registry);
        assert_eq!(all.len(), 4);
        assert!(!all.last().unwrap().is_header);

        let bob = resolver.search(&filtered, "BOB", true, &mut registry);
        assert_eq!(bob, vec![KeyringOption::address(BOB, "bob")]);

        // Header matched by name but not followed by an entry
        assert!(resolver.search(&filtered, "recent", true, &mut registry).is_empty());
    }

    #[test]
    fn test_search_matches_address_fragment() {
        let filtered = vec![
            KeyringOption::address(ALICE, "alice"),
            KeyringOption::address(BOB, "bob"),
        ];
        let resolver = AddressOptionResolver::new(DEFAULT_PREFIX);
        let mut registry = AddressRegistry::new(DEFAULT_PREFIX);
        let matches = resolver.search(&filtered, "5grwva", false, &mut registry);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value.as_deref(), Some(ALICE));
    }
}
