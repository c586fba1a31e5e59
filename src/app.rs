use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::address::shorten;
use crate::domain::{
    AddressBook, AddressKind, AddressOptionResolver, AddressRegistry, KeyringOption,
    OptionBuckets, PreferenceStore, Resolution, ResolverProps, Selection, Subscription,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

pub struct App {
    pub registry: AddressRegistry,
    pub prefs: Box<dyn PreferenceStore>,
    pub resolver: AddressOptionResolver,
    pub props: ResolverProps,
    pub snapshot: Arc<OptionBuckets>,
    pub resolution: Resolution,
    /// Rows currently listed (resolved options or search matches)
    pub visible: Vec<KeyringOption>,
    pub selected: usize,
    /// Marked addresses in multi-select mode
    pub marked: BTreeSet<String>,
    pub input_mode: InputMode,
    pub query: String,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    /// Addresses reported on confirmation
    pub output: Option<Vec<String>>,
    subscription: Subscription,
}

impl App {
    pub fn new(
        mut registry: AddressRegistry,
        prefs: Box<dyn PreferenceStore>,
        props: ResolverProps,
    ) -> Self {
        let subscription = registry.subscribe();
        let snapshot = subscription
            .latest()
            .unwrap_or_else(|| registry.snapshot());
        let resolver = AddressOptionResolver::new(registry.prefix());
        let mut app = Self {
            registry,
            prefs,
            resolver,
            props,
            snapshot,
            resolution: Resolution::Unavailable,
            visible: Vec::new(),
            selected: 0,
            marked: BTreeSet::new(),
            input_mode: InputMode::Normal,
            query: String::new(),
            status: None,
            help_open: false,
            should_quit: false,
            output: None,
            subscription,
        };
        app.refresh();
        app.focus_selection();
        app
    }

    /// Pull the newest registry snapshot, if one arrived
    pub fn pump(&mut self) {
        if let Some(snapshot) = self.subscription.latest() {
            self.snapshot = snapshot;
            self.refresh();
        }
    }

    pub fn refresh(&mut self) {
        self.resolution = self.resolver.resolve(
            &self.snapshot,
            &self.props,
            self.prefs.as_ref(),
            &self.registry,
        );
        self.rebuild_visible();
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > Duration::from_secs(3) {
                self.status = None;
            }
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.resolution == Resolution::Unavailable
    }

    pub fn active_value(&self) -> Option<&str> {
        self.resolution
            .state()
            .and_then(|state| state.active_value.as_deref())
    }

    /// Value the widget shows as chosen
    pub fn selection_label(&self) -> String {
        match self.resolution.state().map(|state| &state.selection) {
            Some(Selection::Single(Some(address))) => self.label_for(address),
            Some(Selection::Multiple(values)) if !values.is_empty() => {
                format!("{} selected", values.len())
            }
            _ => "none".to_string(),
        }
    }

    pub fn label_for(&self, address: &str) -> String {
        let name = self.registry.display_name(address);
        let short = shorten(address);
        if name == short {
            short
        } else {
            format!("{name} ({short})")
        }
    }

    pub fn current_option(&self) -> Option<&KeyringOption> {
        self.visible.get(self.selected)
    }

    // === Navigation ===

    pub fn move_selection_up(&mut self) {
        let mut index = self.selected;
        while index > 0 {
            index -= 1;
            if self.is_selectable(index) {
                self.selected = index;
                return;
            }
        }
    }

    pub fn move_selection_down(&mut self) {
        let mut index = self.selected;
        while index + 1 < self.visible.len() {
            index += 1;
            if self.is_selectable(index) {
                self.selected = index;
                return;
            }
        }
    }

    pub fn go_to_top(&mut self) {
        self.selected = (0..self.visible.len())
            .find(|index| self.is_selectable(*index))
            .unwrap_or(0);
    }

    pub fn go_to_bottom(&mut self) {
        self.selected = (0..self.visible.len())
            .rev()
            .find(|index| self.is_selectable(*index))
            .unwrap_or(0);
    }

    // === Search ===

    pub fn enter_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn exit_search(&mut self, keep_query: bool) {
        self.input_mode = InputMode::Normal;
        if !keep_query {
            self.query.clear();
            self.rebuild_visible();
            self.focus_selection();
        }
    }

    pub fn push_query(&mut self, ch: char) {
        self.query.push(ch);
        self.rebuild_visible();
        self.go_to_top();
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.rebuild_visible();
        self.go_to_top();
    }

    // === Selection ===

    /// Confirm the highlighted row (or the marked set in multi mode)
    pub fn confirm(&mut self) {
        if self.is_unavailable() {
            self.set_status("No accounts are available for selection", StatusLevel::Warn);
            return;
        }
        if self.props.is_disabled {
            self.output = Some(self.active_value().map(str::to_string).into_iter().collect());
            self.should_quit = true;
            return;
        }

        if self.props.is_multiple {
            let mut addresses: Vec<String> = self.marked.iter().cloned().collect();
            if addresses.is_empty() {
                addresses.extend(self.current_option().and_then(|option| option.value.clone()));
            }
            let reported = self.resolver.on_change_multiple(&addresses);
            if reported.is_empty() {
                self.set_status("Nothing selected", StatusLevel::Warn);
                return;
            }
            self.output = Some(reported);
            self.should_quit = true;
            return;
        }

        let Some(address) = self.current_option().and_then(|option| option.value.clone()) else {
            return;
        };
        let reported =
            self.resolver
                .on_change(&address, &self.snapshot, &self.props, self.prefs.as_mut());
        match reported {
            Some(address) => {
                self.output = Some(vec![address]);
                self.should_quit = true;
            }
            None => {
                self.set_status(
                    format!("{} is not selectable here", shorten(&address)),
                    StatusLevel::Error,
                );
                self.refresh();
            }
        }
    }

    pub fn toggle_mark(&mut self) {
        if !self.props.is_multiple {
            return;
        }
        let Some(address) = self.current_option().and_then(|option| option.value.clone()) else {
            return;
        };
        if !self.marked.remove(&address) {
            self.marked.insert(address);
        }
    }

    pub fn cycle_type(&mut self) {
        self.props.option_type = self.props.option_type.next();
        self.query.clear();
        self.marked.clear();
        self.refresh();
        self.focus_selection();
        let text = format!("Type: {}", self.props.option_type);
        self.set_status(text, StatusLevel::Info);
    }

    pub fn copy_selected(&mut self) {
        let Some(address) = self.current_option().and_then(|option| option.value.clone()) else {
            return;
        };
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(address));
        match result {
            Ok(()) => self.set_status("Copied address", StatusLevel::Info),
            Err(err) => self.set_status(format!("Clipboard unavailable: {err}"), StatusLevel::Warn),
        }
    }

    /// Drop the highlighted address book or recent entry
    pub fn forget_selected(&mut self) {
        let Some(address) = self.current_option().and_then(|option| option.value.clone()) else {
            return;
        };
        let removable = self
            .registry
            .lookup(&address)
            .map(|meta| matches!(meta.kind, AddressKind::Contact | AddressKind::Recent))
            .unwrap_or(false);
        if !removable {
            self.set_status("Only saved addresses can be forgotten", StatusLevel::Warn);
            return;
        }
        if self.registry.forget(&address) {
            self.marked.remove(&address);
            self.pump();
            self.set_status(format!("Forgot {}", shorten(&address)), StatusLevel::Info);
        }
    }

    pub fn toggle_help(&mut self) {
        self.help_open = !self.help_open;
    }

    fn rebuild_visible(&mut self) {
        let Some(state) = self.resolution.state() else {
            self.visible.clear();
            self.selected = 0;
            return;
        };
        self.visible = if self.query.trim().is_empty() {
            state.options.clone()
        } else {
            let filtered = state.filtered.clone();
            self.resolver.search(
                &filtered,
                &self.query,
                self.props.is_input,
                &mut self.registry,
            )
        };
        if self.selected >= self.visible.len() {
            self.go_to_bottom();
        } else if !self.is_selectable(self.selected) {
            self.move_selection_down();
        }
    }

    // Put the cursor on the widget's current value
    fn focus_selection(&mut self) {
        let target = match self.resolution.state().map(|state| &state.selection) {
            Some(Selection::Single(Some(address))) => Some(address.clone()),
            _ => None,
        };
        let index = target.and_then(|address| {
            self.visible
                .iter()
                .position(|option| option.value.as_deref() == Some(address.as_str()))
        });
        match index {
            Some(index) => self.selected = index,
            None => self.go_to_top(),
        }
    }

    fn is_selectable(&self, index: usize) -> bool {
        self.visible
            .get(index)
            .map(KeyringOption::has_value)
            .unwrap_or(false)
    }
}
