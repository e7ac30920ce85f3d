use crate::api::DetailForm;
use crate::app::{App, ModalButton};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Note modal shown before a status change or reassignment is posted.
/// Records its area and button rects so clicks can confirm, cancel or hit the backdrop.
pub fn draw_confirm_modal(f: &mut Frame, app: &mut App, form: DetailForm, area: Rect) {
    let Some(flow) = app.detail.as_ref().map(|d| d.flow(form)) else {
        return;
    };
    let title = format!(" {} ", flow.title());
    let description = flow.description();
    let note = flow.modal().map(|m| m.note.clone()).unwrap_or_default();

    let modal = super::centered_rect(56, 11, area);
    app.modal_area = Some(modal);
    app.modal_buttons.clear();
    f.render_widget(Clear, modal);

    let close = Rect::new(modal.x + modal.width.saturating_sub(4), modal.y, 3, 1);
    app.modal_buttons.push((ModalButton::Close, close));

    let block = Block::default()
        .title(title)
        .title(Line::from(" ✕ ").right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(modal);
    f.render_widget(block, modal);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Question
            Constraint::Length(3), // Note input
            Constraint::Length(1), // Buttons
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Line::from(description)).alignment(Alignment::Center),
        chunks[0],
    );

    let note_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Note (optional) ");
    f.render_widget(Paragraph::new(note.as_str()).block(note_block), chunks[1]);
    f.set_cursor_position(Position::new(
        chunks[1].x + 1 + note.chars().count() as u16,
        chunks[1].y + 1,
    ));

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let confirm = Paragraph::new(" [Enter] Confirm ")
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    let cancel = Paragraph::new(" [Esc] Cancel ")
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    f.render_widget(confirm, buttons[0]);
    f.render_widget(cancel, buttons[1]);
    app.modal_buttons.push((ModalButton::Confirm, buttons[0]));
    app.modal_buttons.push((ModalButton::Cancel, buttons[1]));
}
