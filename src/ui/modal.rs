// Modal UI components.
// Form dialogs for create/edit/upload and confirmation of destructive actions.

use ratatui::{prelude::*, widgets::*};

use crate::state::forms::{
    ConfirmState, CreateField, CreateForm, EditField, EditForm, UploadField, UploadForm,
};

/// Centered rectangle for a modal.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// One labelled text-input line, with a block cursor when focused.
fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<12}", label),
        Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }),
    )];
    spans.push(Span::raw(value.to_string()));
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

/// One labelled checkbox line.
fn checkbox_line(label: &str, checked: bool, focused: bool) -> Line<'static> {
    let box_str = if checked { "[x]" } else { "[ ]" };
    Line::from(vec![
        Span::styled(
            format!("{:<12}", label),
            Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }),
        ),
        Span::styled(
            box_str.to_string(),
            Style::default().fg(if focused { Color::Yellow } else { Color::White }),
        ),
    ])
}

fn error_line(error: &Option<String>) -> Line<'static> {
    match error {
        Some(e) => Line::from(Span::styled(
            e.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(""),
    }
}

fn instructions(extra: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(format!(" = {}  ", extra), Style::default().fg(Color::DarkGray)),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::styled(" = Next field  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" = Cancel ", Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_form(frame: &mut Frame, title: &str, lines: Vec<Line<'static>>, height: u16) {
    let area = centered(frame.area(), 64, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title.to_string());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Draw the create-repository form.
pub fn draw_create_modal(frame: &mut Frame, form: &CreateForm) {
    let status = if form.submitting {
        Line::from(Span::styled(
            "Creating...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        error_line(&form.error)
    };

    let lines = vec![
        input_line("Name", &form.name, form.focus == CreateField::Name),
        input_line(
            "Description",
            &form.description,
            form.focus == CreateField::Description,
        ),
        checkbox_line("Private", form.private, form.focus == CreateField::Private),
        checkbox_line(
            "Init README",
            form.auto_init,
            form.focus == CreateField::AutoInit,
        ),
        Line::from(""),
        status,
        instructions("Create"),
    ];
    draw_form(frame, " New Repository ", lines, 9);
}

/// Draw the edit-metadata form.
pub fn draw_edit_modal(frame: &mut Frame, form: &EditForm) {
    let status = if form.submitting {
        Line::from(Span::styled(
            "Saving...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        error_line(&form.error)
    };

    let title = format!(" Edit {}/{} ", form.owner, form.repo);
    let lines = vec![
        input_line(
            "Description",
            &form.description,
            form.focus == EditField::Description,
        ),
        checkbox_line("Private", form.private, form.focus == EditField::Private),
        Line::from(""),
        status,
        instructions("Save"),
    ];
    draw_form(frame, &title, lines, 7);
}

/// Draw the upload-file form.
pub fn draw_upload_modal(frame: &mut Frame, form: &UploadForm) {
    let status = if form.submitting {
        Line::from(Span::styled(
            "Uploading...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        error_line(&form.error)
    };

    let title = format!(" Upload to {}/{} ", form.owner, form.repo);
    let mut lines = vec![
        input_line(
            "Local file",
            &form.local_path,
            form.focus == UploadField::LocalPath,
        ),
        input_line(
            "Repo path",
            &form.repo_path,
            form.focus == UploadField::RepoPath,
        ),
        input_line("Message", &form.message, form.focus == UploadField::Message),
    ];
    if form.existing_sha.is_some() {
        lines.push(Line::from(Span::styled(
            "Replaces the existing file at this path",
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(""));
    lines.push(status);
    lines.push(instructions("Upload"));
    draw_form(frame, &title, lines, 10);
}

/// Draw the confirmation dialog for a destructive action.
pub fn draw_confirm_modal(frame: &mut Frame, confirm: &ConfirmState) {
    let status = if confirm.submitting {
        Line::from(Span::styled(
            "Working...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        error_line(&confirm.error)
    };

    let mut lines = vec![
        Line::from(confirm.prompt()),
        Line::from(""),
    ];
    if confirm.required_confirmation().is_some() {
        lines.push(input_line("Name", &confirm.typed, true));
        lines.push(Line::from(""));
    }
    lines.push(status);
    lines.push(Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" = Confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" = Cancel ", Style::default().fg(Color::DarkGray)),
    ]));

    let height = lines.len() as u16 + 2;
    let area = centered(frame.area(), 64, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(confirm.title());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
