use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;

use crate::app::{App, InputMode, StatusLevel};
use crate::config;
use crate::domain::address::shorten;
use crate::domain::{AddressBook, AddressKind, FilterMode, Selection};

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    if app.is_unavailable() {
        draw_unavailable(f, areas.list.union(areas.details));
    } else {
        draw_list_panel(f, areas.list, app);
        draw_detail_panel(f, areas.details, app);
    }
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mode = if app.props.is_disabled {
        "locked"
    } else if app.props.is_multiple {
        "multi"
    } else {
        "single"
    };
    let title = Line::from(vec![
        Span::styled(
            "dotpick",
            Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Type ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.props.option_type)),
        Span::styled("Mode ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{mode}  ")),
        Span::styled("Selected ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.selection_label()),
    ]);
    let left = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
    f.render_widget(left, chunks[0]);

    let right = Paragraph::new(Line::from(vec![
        Span::styled("SS58 ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.registry.prefix().to_string()),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(right, chunks[1]);
}

fn draw_unavailable(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("no accounts are available for selection")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Accounts"));
    f.render_widget(paragraph, area);
}

fn draw_list_panel(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.query.trim().is_empty() {
        format!("Accounts ({})", selectable_count(app))
    } else {
        format!("Search \"{}\" ({})", app.query.trim(), selectable_count(app))
    };
    let active = app.active_value();
    let tracked = match app.resolution.state().map(|state| &state.selection) {
        Some(Selection::Single(Some(address))) => Some(address.as_str()),
        _ => None,
    };

    let items: Vec<ListItem> = app
        .visible
        .iter()
        .map(|option| {
            let Some(address) = option.value.as_deref() else {
                return ListItem::new(Line::from(Span::styled(
                    option.name.to_uppercase(),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )));
            };
            let marker = if app.props.is_multiple {
                if app.marked.contains(address) {
                    "[x] "
                } else {
                    "[ ] "
                }
            } else if Some(address) == tracked || (tracked.is_none() && Some(address) == active) {
                "* "
            } else {
                "  "
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::LightGreen)),
                Span::raw(format!("{:<16} ", option.name)),
                Span::styled(shorten(address), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !app.visible.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    match app.current_option().and_then(|option| option.value.as_deref()) {
        Some(address) => {
            let meta = app.registry.lookup(address);
            let name = meta
                .as_ref()
                .map(|meta| meta.name.clone())
                .unwrap_or_else(|| "(unknown)".to_string());
            let kind = match meta.as_ref().map(|meta| meta.kind) {
                Some(AddressKind::Account) => "account",
                Some(AddressKind::Development) => "development",
                Some(AddressKind::Contact) => "address book",
                Some(AddressKind::Recent) => "recent",
                None => "external",
            };
            lines.push(detail_line("Name", name));
            lines.push(detail_line("Kind", kind.to_string()));
            lines.push(Line::from(Span::styled(
                "Address",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(address.to_string()));
            if let Some(added_at) = meta.and_then(|meta| meta.added_at) {
                lines.push(detail_line(
                    "Added",
                    added_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                ));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "No selectable entry",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    lines.push(Line::from(""));
    if let Some(state) = app.resolution.state() {
        lines.push(detail_line(
            "Active",
            state
                .active_value
                .as_deref()
                .map(|address| app.label_for(address))
                .unwrap_or_else(|| "--".to_string()),
        ));
        lines.push(detail_line(
            "Last used",
            state
                .last_value
                .as_deref()
                .map(shorten)
                .unwrap_or_else(|| "--".to_string()),
        ));
    }
    let filter = match app.props.filter.as_ref() {
        Some(filter) => {
            let mode = match filter.mode {
                FilterMode::Include => "include",
                FilterMode::Exclude => "exclude",
            };
            format!("{mode} {}", filter.values.len())
        }
        None => "none".to_string(),
    };
    lines.push(detail_line("Filter", filter));
    lines.push(detail_line("Prefix", app.registry.prefix().to_string()));
    lines.push(detail_line("Known", app.registry.entries().len().to_string()));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Inspector"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.status_text() {
        Some((text, level)) => {
            let color = match level {
                StatusLevel::Info => Color::LightGreen,
                StatusLevel::Warn => Color::Yellow,
                StatusLevel::Error => Color::LightRed,
            };
            Line::from(Span::styled(text.to_string(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            "Enter select  / search  t type  y copy  ? help  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Search => Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Yellow)),
            Span::raw(&app.query),
            Span::styled(
                "  name, address fragment, or a full address",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        InputMode::Normal if !app.query.is_empty() => Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::DarkGray)),
            Span::raw(&app.query),
        ]),
        InputMode::Normal => Line::from(""),
    };
    f.render_widget(Paragraph::new(content), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = layout::centered_rect(64, 60, area);
    f.render_widget(Clear, popup_area);

    let config_path = config::config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(unknown)".to_string());
    let lines = vec![
        Line::from("Navigation"),
        Line::from("  j / k      Move selection"),
        Line::from("  g / G      Top / bottom"),
        Line::from("  Esc        Clear search / quit"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  Enter      Select"),
        Line::from("  Space      Mark (multi-select)"),
        Line::from("  /          Search; a full address adds it as recent"),
        Line::from("  t          Cycle type"),
        Line::from("  y          Copy address"),
        Line::from("  d          Forget saved address"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from(format!("Config: {config_path}")),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, popup_area);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn selectable_count(app: &App) -> usize {
    app.visible.iter().filter(|option| option.has_value()).count()
}
