use crate::api::DetailForm;
use crate::app::{App, SelectTarget};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

fn dropdown_title(target: SelectTarget) -> String {
    match target {
        SelectTarget::Field(field) => format!(" {} ", field.label()),
        SelectTarget::Detail(DetailForm::State) => " Change Status ".to_string(),
        SelectTarget::Detail(DetailForm::Assign) => " Reassign ".to_string(),
    }
}

fn current_value(app: &App, target: SelectTarget) -> Option<i64> {
    match target {
        SelectTarget::Field(field) => app.form.select(field).and_then(|s| s.selected),
        SelectTarget::Detail(form) => app.detail.as_ref().and_then(|d| d.flow(form).select.selected),
    }
}

pub fn draw_select_dropdown(f: &mut Frame, app: &mut App, target: SelectTarget, area: Rect) {
    let options = app.filtered_options(target);
    let current = current_value(app, target);
    let items: Vec<ListItem> = options
        .iter()
        .map(|o| {
            let marker = if Some(o.id) == current { "● " } else { "  " };
            ListItem::new(format!("{marker}{}", o.name))
        })
        .collect();

    let filter_input = app.filter_input.clone();
    draw_searchable_dropdown(f, app, area, &dropdown_title(target), items, &filter_input);
}

fn draw_searchable_dropdown(
    f: &mut Frame,
    app: &mut App,
    area: Rect,
    title: &str,
    items: Vec<ListItem>,
    filter_input: &str,
) {
    // +3 for search input area
    let height = (items.len() + 5).min(18) as u16;
    let inner = super::centered_rect(45, height, area);
    f.render_widget(Clear, inner);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(0),    // List
        ])
        .split(inner);

    let search_block = Block::default().borders(Borders::ALL).title(title);
    let search_para = Paragraph::new(format!("🔍 {filter_input}")).block(search_block);
    f.render_widget(search_para, chunks[0]);

    f.set_cursor_position(Position::new(
        chunks[0].x + 4 + filter_input.chars().count() as u16,
        chunks[0].y + 1,
    ));

    let list_block = Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM);
    let list = List::new(items).block(list_block).highlight_style(
        Style::default().bg(app.config.theme.parse_color(&app.config.theme.selected_bg)),
    );

    f.render_stateful_widget(list, chunks[1], &mut app.dropdown_list_state);
}

pub fn draw_path_prompt(f: &mut Frame, app: &App, title: &str, area: Rect) {
    let inner = super::centered_rect(70, 3, area);
    f.render_widget(Clear, inner);

    let block = Block::default().borders(Borders::ALL).title(title);
    let paragraph = Paragraph::new(app.path_input.as_str()).block(block);
    f.render_widget(paragraph, inner);

    f.set_cursor_position(Position::new(
        inner.x + 1 + app.path_input.chars().count() as u16,
        inner.y + 1,
    ));
}
