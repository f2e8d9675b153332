// UI module for rendering the TUI.
// Screens for token entry and the dashboard, plus modals and the help overlay.

mod breadcrumb;
mod list;
mod modal;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Screen, Tab};
use crate::state::{ConsoleLevel, Modal, ViewLevel};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    match app.screen {
        Screen::TokenEntry => draw_token_screen(frame, app),
        Screen::Dashboard => draw_dashboard(frame, app),
    }

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Token entry screen, shown until a token validates.
fn draw_token_screen(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let modal_width = 70u16.min(area.width);
    let modal_height = 9u16.min(area.height);
    let x = (area.width.saturating_sub(modal_width)) / 2;
    let y = (area.height.saturating_sub(modal_height)) / 2;
    let modal_area = Rect::new(x, y, modal_width, modal_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" repodeck sign in ");

    // Tokens stay off-screen; show a dot per character.
    let masked: String = "•".repeat(app.token_input.chars().count());
    let input_line = Line::from(vec![
        Span::styled("Token: ", Style::default().fg(Color::DarkGray)),
        Span::raw(masked),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]);

    let status = if app.validating {
        Line::from(Span::styled(
            "Validating token...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = &app.token_error {
        Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))
    } else {
        Line::from("")
    };

    let lines = vec![
        Line::from("Paste a GitHub personal access token with the repo scope."),
        Line::from(Span::styled(
            "The token is stored locally and only sent to api.github.com.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        input_line,
        Line::from(""),
        status,
        Line::from(vec![
            Span::styled(" Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" = Sign in  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" = Quit ", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    frame.render_widget(Clear, modal_area);
    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}

fn draw_dashboard(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(2), // Breadcrumb
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);

    match app.active_tab {
        Tab::Repositories => {
            let breadcrumbs = app.repos.nav.breadcrumbs();
            breadcrumb::draw_breadcrumb(frame, &breadcrumbs, chunks[1]);
        }
        Tab::Console => {
            let block = Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray));
            frame.render_widget(block, chunks[1]);
        }
    }

    match app.active_tab {
        Tab::Repositories => draw_repositories_tab(frame, app, chunks[2]),
        Tab::Console => draw_console_tab(frame, app, chunks[2]),
    }

    draw_status_bar(frame, app, chunks[3]);

    // Modal overlay
    match &app.modal {
        Some(Modal::Create(form)) => modal::draw_create_modal(frame, form),
        Some(Modal::Edit(form)) => modal::draw_edit_modal(frame, form),
        Some(Modal::Upload(form)) => modal::draw_upload_modal(frame, form),
        Some(Modal::Confirm(confirm)) => modal::draw_confirm_modal(frame, confirm),
        None => {}
    }
}

fn draw_repositories_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    // Reserve a row for the filter when it is active or non-default.
    let show_filter = app.repos.filter_active || !app.repos.filter.is_default();
    let (filter_area, content_area) = if show_filter {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, area)
    };

    if let Some(filter_area) = filter_area {
        draw_filter_row(frame, app, filter_area);
    }

    match app.repos.current_view().clone() {
        ViewLevel::Repositories => {
            list::render_repo_list(frame, &mut app.repos, content_area);
        }
        ViewLevel::Contents { .. } => {
            list::render_contents_list(frame, &mut app.repos.contents, content_area);
        }
    }
}

fn draw_filter_row(frame: &mut Frame, app: &App, area: Rect) {
    let filter = &app.repos.filter;
    let mut spans = vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(filter.query.clone()),
    ];
    if app.repos.filter_active {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(
        format!(
            "   [visibility: {}] [sort: {}]",
            filter.visibility.label(),
            filter.sort.label()
        ),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_console_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.console.messages.is_empty() {
        list::render_empty(frame, area, "No activity yet");
        return;
    }

    let items: Vec<ListItem> = app
        .console
        .messages
        .iter()
        .map(|msg| {
            let (prefix, color) = match msg.level {
                ConsoleLevel::Info => ("INFO ", Color::Green),
                ConsoleLevel::Warn => ("WARN ", Color::Yellow),
                ConsoleLevel::Error => ("ERROR", Color::Red),
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", msg.timestamp.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{} ", prefix), Style::default().fg(color)),
                Span::raw(msg.message.clone()),
            ]))
        })
        .collect();

    let widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Activity "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    frame.render_stateful_widget(widget, area, &mut app.console.list_state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(banner) = &app.banner {
        let text = Paragraph::new(Line::from(Span::styled(
            format!(" ✓ {} ", banner),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(text, area);
        return;
    }

    let hints = match app.active_tab {
        Tab::Repositories => match app.repos.current_view() {
            ViewLevel::Repositories => {
                " ↑↓ move  Enter open  n new  e edit  v visibility  d delete  u upload  / filter  ? help  q quit"
            }
            ViewLevel::Contents { .. } => {
                " ↑↓ move  Enter open dir  u upload  d delete file  r refresh  Esc back  ? help  q quit"
            }
        },
        Tab::Console => " ↑↓ scroll  Tab back to repositories  q quit",
    };

    let text = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(text, area);
}

/// Keyboard reference overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let width = 56u16.min(area.width);
    let height = 18u16.min(area.height);
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let modal_area = Rect::new(x, y, width, height);

    let rows = [
        ("↑/↓, j/k", "Move selection"),
        ("Enter", "Open repository / directory"),
        ("Esc", "Back"),
        ("/", "Filter by name or description"),
        ("f", "Cycle visibility filter"),
        ("s", "Cycle sort (updated/name/stars)"),
        ("n", "New repository"),
        ("e", "Edit description and visibility"),
        ("v", "Toggle public/private"),
        ("d", "Delete repository or file"),
        ("u", "Upload file"),
        ("r", "Refresh (bypass cache)"),
        ("Tab", "Switch tab"),
        ("o", "Sign out"),
        ("q", "Quit"),
    ];

    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<10}", key),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(*action),
            ])
        })
        .collect();

    frame.render_widget(Clear, modal_area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Keys "),
        ),
        modal_area,
    );
}
