mod detail;
mod dialogs;
mod help;
mod input;
mod nav;
mod wizard;

use crate::app::{App, InputMode, Page};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    // Main vertical layout: header (3) + content + status bar (1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar with nav toggle
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status/help bar
        ])
        .split(size);

    draw_header(f, app, chunks[0]);

    // Collapsible navigation panel on the left
    let content = if app.nav.is_open() {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(0)])
            .split(chunks[1]);
        nav::draw_panel(f, app, split[0]);
        split[1]
    } else {
        chunks[1]
    };

    match app.page {
        Page::Create => wizard::draw(f, app, content),
        Page::Detail => detail::draw(f, app, content),
    }

    draw_status_bar(f, app, chunks[2]);

    // Overlays (modals, dropdowns, help)
    match app.input_mode {
        InputMode::Help => help::draw_popup(f, app, size),
        InputMode::Dropdown(target) => input::draw_select_dropdown(f, app, target, size),
        InputMode::AttachPath => input::draw_path_prompt(f, app, " Attach file (path) ", size),
        InputMode::DetailFilePath => input::draw_path_prompt(f, app, " Choose file (path) ", size),
        InputMode::Confirm(form) => dialogs::draw_confirm_modal(f, app, form, size),
        InputMode::Normal | InputMode::Nav | InputMode::EditText(_) => {}
    }

    if app.loading {
        draw_loading(f, app, size);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let expanded = app.nav.is_open();
    let toggle = if expanded { "[m] ☰ Menu ▾" } else { "[m] ☰ Menu ▸" };
    let page = match app.page {
        Page::Create => "Create ticket".to_string(),
        Page::Detail => app
            .detail
            .as_ref()
            .map(|d| format!("Ticket #{}", d.ticket_id))
            .unwrap_or_default(),
    };

    let line = Line::from(vec![
        Span::styled(
            toggle,
            Style::default().fg(theme.parse_color(if expanded {
                &theme.border_active
            } else {
                &theme.text_muted
            })),
        ),
        Span::raw("  "),
        Span::styled("incidex", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  │  "),
        Span::styled(page, Style::default().fg(theme.parse_color(&theme.highlight))),
        Span::styled(
            format!("  {}", app.client.base_url),
            Style::default().fg(theme.parse_color(&theme.text_muted)),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.parse_color(&theme.border)));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let style = if app.status_is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content: String = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        match app.input_mode {
            InputMode::Normal => match app.page {
                Page::Create => {
                    if app.navigation_locked() {
                        "Waiting for the server...".into()
                    } else {
                        "Tab:field  Enter:edit  n/p:next/prev  1-4:steps  m:menu  ?:help  q:quit".into()
                    }
                }
                Page::Detail => "s:status  r:reassign  f:file  m:menu  ?:help  q:quit".into(),
            },
            InputMode::Nav => "j/k:select  Enter:open  Esc/m:close".into(),
            InputMode::EditText(crate::form::Field::Description) => "Enter:newline  Esc:done".into(),
            InputMode::EditText(_) => "Enter/Esc:done".into(),
            InputMode::Confirm(_) => "type a note  Enter:confirm  Esc:cancel".into(),
            _ => "j/k:select  Enter:confirm  Esc:cancel".into(),
        }
    };

    let paragraph = Paragraph::new(content).style(style);
    f.render_widget(paragraph, area);
}

fn draw_loading(f: &mut Frame, app: &App, area: Rect) {
    let spinner = app.spinner_char();
    let message = if app.loading_message.is_empty() {
        "Loading..."
    } else {
        &app.loading_message
    };

    let text = format!(" {spinner} {message} ");
    let width = (text.len() as u16).clamp(20, 50);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = centered_rect(width, 3, area);
    f.render_widget(Clear, inner);
    f.render_widget(block, inner);

    let text_area = Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), 1);
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, text_area);
}

// Helper: create a centered rect
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

// Helper: styled block with focus indicator
pub fn styled_block<'a>(
    title: &'a str,
    focused: bool,
    theme: &'a crate::config::Theme,
) -> Block<'a> {
    let border_color = if focused {
        theme.parse_color(&theme.border_active)
    } else {
        theme.parse_color(&theme.border)
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
}
