// List rendering for repositories and contents.
// Styled list views with loading, error, and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::github::{ContentEntry, Repository};
use crate::state::{LoadingState, RepoTabState, SelectableList};

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Format a byte count for the contents listing.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

fn repo_line(repo: &Repository) -> Line<'static> {
    let mut spans = vec![Span::styled(
        repo.name.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];

    if repo.private {
        spans.push(Span::styled(
            " 🔒 private",
            Style::default().fg(Color::Magenta),
        ));
    }
    if repo.fork {
        spans.push(Span::styled(" (fork)", Style::default().fg(Color::DarkGray)));
    }

    spans.push(Span::styled(
        format!("  ★ {}", repo.stargazers_count),
        Style::default().fg(Color::Yellow),
    ));
    spans.push(Span::styled(
        format!("  ⑂ {}", repo.forks_count),
        Style::default().fg(Color::Blue),
    ));

    if let Some(language) = &repo.language {
        spans.push(Span::styled(
            format!("  {}", language),
            Style::default().fg(Color::Green),
        ));
    }

    spans.push(Span::styled(
        format!("  updated {}", format_relative_time(&repo.updated_at)),
        Style::default().fg(Color::DarkGray),
    ));

    if let Some(description) = &repo.description {
        spans.push(Span::styled(
            format!("  - {}", description),
            Style::default().fg(Color::Gray),
        ));
    }

    Line::from(spans)
}

/// Render the repositories list with filter and pagination footer.
pub fn render_repo_list(frame: &mut Frame, state: &mut RepoTabState, area: Rect) {
    match &state.repos {
        LoadingState::Idle => render_empty(frame, area, "Press r to load repositories"),
        LoadingState::Loading => render_loading(frame, area, "Loading repositories"),
        LoadingState::Error(e) => render_error(frame, area, &e.clone()),
        LoadingState::Loaded(_) => {
            let visible = state.visible_repos();
            let total = state.repos.data().map_or(0, Vec::len);

            if visible.is_empty() {
                let message = if total == 0 {
                    "No repositories. Press n to create one."
                } else {
                    "No repositories match the filter."
                };
                render_empty(frame, area, message);
                return;
            }

            let items: Vec<ListItem> = visible.iter().map(|repo| ListItem::new(repo_line(repo))).collect();

            let mut title = format!(" Repositories ({}/{}) ", visible.len(), total);
            if state.has_more {
                title.push_str("… ");
            }

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray))
                        .title(title),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");

            frame.render_stateful_widget(list, area, &mut state.list_state);
        }
    }
}

/// Render a contents listing (files and directories at one path).
pub fn render_contents_list(
    frame: &mut Frame,
    list: &mut SelectableList<ContentEntry>,
    area: Rect,
) {
    match &list.data {
        LoadingState::Idle | LoadingState::Loading => {
            render_loading(frame, area, "Loading contents")
        }
        LoadingState::Error(e) => render_error(frame, area, &e.clone()),
        LoadingState::Loaded(entries) => {
            if entries.is_empty() {
                render_empty(frame, area, "Empty directory. Press u to upload a file.");
                return;
            }

            let items: Vec<ListItem> = entries
                .iter()
                .map(|entry| {
                    let (icon, color) = if entry.is_dir() {
                        ("📁", Color::Cyan)
                    } else {
                        ("📄", Color::White)
                    };
                    let mut spans = vec![
                        Span::raw(format!("{} ", icon)),
                        Span::styled(entry.name.clone(), Style::default().fg(color)),
                    ];
                    if !entry.is_dir() {
                        spans.push(Span::styled(
                            format!("  {}", format_size(entry.size)),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();

            let widget = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray))
                        .title(" Contents "),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");

            frame.render_stateful_widget(widget, area, &mut list.list_state);
        }
    }
}
