use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use dotpick::app::{App, InputMode, StatusLevel};
use dotpick::chains::{endpoint_listing, find_by_info, find_parachain, Network};
use dotpick::config::{self, Config, FilterSpec};
use dotpick::domain::address::AddressInput;
use dotpick::domain::{
    AddressRegistry, MemoryPreferences, OptionFilter, OptionType, PreferenceStore, ResolverProps,
};
use dotpick::store::{AddressStore, SettingsStore};
use dotpick::ui;

#[derive(Debug, Parser)]
#[command(
    name = "dotpick",
    version,
    about = "dotpick: a local-first Polkadot/Kusama account picker"
)]
struct Args {
    /// Option bucket to pick from (all, allPlus, account, address, recent, testing)
    #[arg(long = "type")]
    option_type: Option<OptionType>,

    /// Preferred address, used when it is listed (always for allPlus)
    #[arg(long)]
    default: Option<String>,

    /// Show the default address without allowing changes
    #[arg(long)]
    disabled: bool,

    /// Pick several addresses
    #[arg(long)]
    multiple: bool,

    /// Do not accept typed addresses that are not listed
    #[arg(long)]
    no_input: bool,

    /// Only list these addresses
    #[arg(long, conflicts_with = "exclude")]
    include: Vec<String>,

    /// Never list these addresses
    #[arg(long)]
    exclude: Vec<String>,

    /// Network used to encode addresses (polkadot, kusama, westend, substrate)
    #[arg(long)]
    network: Option<Network>,

    /// Config file (defaults to ~/.config/dotpick/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print configured and known RPC endpoints and exit
    #[arg(long)]
    list_endpoints: bool,

    /// Restrict --list-endpoints to one chain (name or para id)
    #[arg(long, requires = "list_endpoints")]
    chain: Option<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging();

    let mut config = match args.config.as_deref() {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    if args.list_endpoints {
        return match args.chain.as_deref() {
            Some(query) => print_chain(query),
            None => print_endpoints(&config),
        };
    }
    if let Some(network) = args.network {
        config.network = network;
        config.ss58_prefix = None;
    }

    let (registry, prefs, warning) = open_stores(&config);
    let props = props_from_args_and_config(&args, &config);
    let mut app = App::new(registry, prefs, props);
    if let Some(warning) = warning {
        app.set_status(warning, StatusLevel::Warn);
    }

    let mut stderr = io::stderr();
    enable_raw_mode()?;
    execute!(stderr, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
        return Ok(ExitCode::FAILURE);
    }

    match app.output.filter(|output| !output.is_empty()) {
        Some(addresses) => {
            let mut stdout = io::stdout().lock();
            for address in addresses {
                writeln!(stdout, "{address}")?;
            }
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        app.pump();
        terminal.draw(|f| ui::draw(f, app))?;
        if app.should_quit {
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.help_open = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Search => handle_search_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        (KeyCode::Char('q'), _) => app.should_quit = true,
        (KeyCode::Esc, _) => {
            if app.query.is_empty() {
                app.should_quit = true;
            } else {
                app.exit_search(false);
            }
        }
        (KeyCode::Char('?'), _) => app.toggle_help(),
        (KeyCode::Char('/'), _) => app.enter_search(),
        (KeyCode::Char('t'), _) => app.cycle_type(),
        (KeyCode::Char('y'), _) => app.copy_selected(),
        (KeyCode::Char('d'), _) => app.forget_selected(),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => app.go_to_top(),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => app.go_to_bottom(),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => app.move_selection_up(),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => app.move_selection_down(),
        (KeyCode::Char(' '), _) => app.toggle_mark(),
        (KeyCode::Enter, _) => app.confirm(),
        _ => {}
    }
}

fn handle_search_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_search(false),
        KeyCode::Enter => {
            app.exit_search(true);
            app.confirm();
        }
        KeyCode::Backspace => app.pop_query(),
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),
        KeyCode::Char(ch) => app.push_query(ch),
        _ => {}
    }
}

fn open_stores(config: &Config) -> (AddressRegistry, Box<dyn PreferenceStore>, Option<String>) {
    let prefix = config.ss58_prefix();
    let opened = open_persistent(prefix);

    let (mut registry, prefs, warning) = match opened {
        Ok((registry, settings)) => {
            let prefs: Box<dyn PreferenceStore> = Box::new(settings);
            (registry, prefs, None)
        }
        Err(err) => {
            log::warn!("persistence disabled: {err:#}");
            let prefs: Box<dyn PreferenceStore> = Box::new(MemoryPreferences::new());
            let warning = format!("Storage disabled: {err}");
            (AddressRegistry::new(prefix), prefs, Some(warning))
        }
    };

    for account in &config.accounts {
        if registry
            .add_account(&account.address, &account.display_name())
            .is_none()
        {
            log::warn!("ignoring invalid account address {}", account.address);
        }
    }
    for entry in &config.addresses {
        if registry
            .add_contact(&entry.address, &entry.display_name())
            .is_none()
        {
            log::warn!("ignoring invalid address book entry {}", entry.address);
        }
    }
    if config.dev_accounts {
        registry.add_development_accounts();
    }

    (registry, prefs, warning)
}

fn open_persistent(prefix: u16) -> Result<(AddressRegistry, SettingsStore)> {
    let path = config::db_path().context("no data directory")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let settings = SettingsStore::open(&path)?;
    let addresses = AddressStore::open(&path)?;
    let registry = AddressRegistry::with_store(prefix, addresses)?;
    Ok((registry, settings))
}

fn props_from_args_and_config(args: &Args, config: &Config) -> ResolverProps {
    let filter = if !args.include.is_empty() {
        Some(OptionFilter::include(args.include.iter().cloned()))
    } else if !args.exclude.is_empty() {
        Some(OptionFilter::exclude(args.exclude.iter().cloned()))
    } else {
        config.filter.as_ref().map(FilterSpec::to_filter)
    };

    ResolverProps {
        option_type: args
            .option_type
            .or(config.default_type)
            .unwrap_or_default(),
        filter,
        is_disabled: args.disabled,
        default_value: args.default.clone().map(AddressInput::Text),
        is_multiple: args.multiple,
        is_input: !args.no_input,
        ..ResolverProps::default()
    }
}

fn print_endpoints(config: &Config) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    for endpoint in endpoint_listing(&config.endpoints) {
        writeln!(stdout, "{:<32} {}", endpoint.label, endpoint.url)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn print_chain(query: &str) -> Result<ExitCode> {
    let found = match query.trim().parse::<u32>() {
        Ok(para_id) => find_parachain(para_id),
        Err(_) => find_by_info(query),
    };
    let Some(chain) = found else {
        eprintln!("unknown chain: {query}");
        return Ok(ExitCode::FAILURE);
    };

    let kind = if chain.is_relay() {
        "relay".to_string()
    } else {
        chain
            .para_id
            .map(|id| format!("para {id}"))
            .unwrap_or_default()
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{} [{}] ({kind})", chain.text, chain.info)?;
    for (provider, url) in chain.providers {
        writeln!(stdout, "  {provider:<22} {url}")?;
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging() {
    let Some(path) = config::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::new().filter_or("DOTPICK_LOG", "warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}
