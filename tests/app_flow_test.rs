//! Picker state driven the way the key handlers drive it

use dotpick::app::{App, StatusLevel};
use dotpick::domain::address::{encode, DEFAULT_PREFIX};
use dotpick::domain::{
    AddressBook, AddressRegistry, MemoryPreferences, OptionType, PreferenceStore, ResolverProps,
};

const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

fn picker(registry: AddressRegistry, props: ResolverProps) -> App {
    App::new(registry, Box::new(MemoryPreferences::new()), props)
}

fn populated() -> AddressRegistry {
    let mut registry = AddressRegistry::new(DEFAULT_PREFIX);
    registry.add_account(ALICE, "alice");
    registry.add_contact(BOB, "bob");
    registry
}

#[test]
fn test_empty_registry_is_unavailable() {
    let mut app = picker(AddressRegistry::new(DEFAULT_PREFIX), ResolverProps::default());
    assert!(app.is_unavailable());
    assert!(app.visible.is_empty());

    app.confirm();
    assert_eq!(app.output, None);
    assert!(!app.should_quit);
    assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));
}

#[test]
fn test_disabled_confirm_reports_default() {
    let props = ResolverProps {
        is_disabled: true,
        default_value: Some(ALICE.into()),
        ..ResolverProps::default()
    };
    let mut app = picker(AddressRegistry::new(DEFAULT_PREFIX), props);
    assert!(!app.is_unavailable());
    assert_eq!(app.visible.len(), 1);

    app.confirm();
    assert_eq!(app.output, Some(vec![ALICE.to_string()]));
    assert_eq!(app.prefs.last_value(OptionType::All), None);
}

#[test]
fn test_cycle_type_switches_bucket() {
    let mut app = picker(populated(), ResolverProps::default());
    assert_eq!(app.visible.len(), 2);
    assert_eq!(app.active_value(), Some(ALICE));

    app.cycle_type();
    assert_eq!(app.props.option_type, OptionType::AllPlus);
    assert_eq!(app.visible.len(), 4);
    assert_eq!(app.active_value(), Some(BOB));
    assert_eq!(app.current_option().and_then(|o| o.value.as_deref()), Some(BOB));
}

#[test]
fn test_search_by_name_then_confirm() {
    let props = ResolverProps {
        option_type: OptionType::AllPlus,
        ..ResolverProps::default()
    };
    let mut app = picker(populated(), props);
    app.enter_search();
    for ch in "ALI".chars() {
        app.push_query(ch);
    }
    assert_eq!(app.visible.len(), 1);
    app.exit_search(true);
    app.confirm();
    assert_eq!(app.output, Some(vec![ALICE.to_string()]));
    assert_eq!(app.prefs.last_value(OptionType::AllPlus).as_deref(), Some(ALICE));
}

#[test]
fn test_typed_address_ignored_without_input_mode() {
    let props = ResolverProps {
        is_input: false,
        ..ResolverProps::default()
    };
    let mut app = picker(populated(), props);
    let typed = encode(&[77u8; 32], DEFAULT_PREFIX).unwrap();
    app.enter_search();
    for ch in typed.chars() {
        app.push_query(ch);
    }
    assert!(app.visible.is_empty());
    assert_eq!(app.registry.lookup(&typed), None);

    // Nothing highlighted, nothing reported
    app.confirm();
    assert_eq!(app.output, None);
}
